use anyhow::Result;
use clap::{CommandFactory, Parser};
use pdf2html_batch::cli::Cli;
use pdf2html_batch::{logger, App, AppError};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析参数并构建配置
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init(verbose);
            return fail_startup(e);
        }
    };
    logger::init(config.verbose_logging);

    // 启动检查，失败时不写任何文件
    let app = match App::initialize(config) {
        Ok(app) => app,
        Err(e) => return fail_startup(e),
    };

    // 概览任务在阻塞线程池中运行，运行时关闭前会等待它结束
    let report = app.run().await?;
    if report.failed() > 0 {
        anyhow::bail!("{} 个批次渲染失败", report.failed());
    }

    Ok(())
}

fn fail_startup(e: AppError) -> Result<()> {
    error!("{}", e);
    eprintln!("{}", "*".repeat(60));
    eprintln!("错误:\t{}", e);
    if let AppError::MissingDependency { .. } = e {
        eprintln!("请确认渲染程序存在，不要删除 lib 目录中的任何文件，或使用 --renderer 指定路径。");
    }
    eprintln!();
    let _ = Cli::command().print_help();
    Err(e.into())
}
