use crate::config::{self, Config};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Platform;
use clap::Parser;
use std::path::PathBuf;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "pdf2html-batch")]
#[command(version, about = "按章节清单把 PDF 分批渲染为 HTML")]
#[command(after_help = "渲染程序默认位于 <工作目录>/lib/ 下，请勿删除 lib 目录中的任何文件。")]
pub struct Cli {
    /// 章节清单文件 (.txt)，每两行一条记录：标题、页码范围
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// 要转换的 PDF 文件
    #[arg(value_name = "PDF")]
    pub source_pdf: PathBuf,

    /// 并发数量 [1, 50]，默认 8
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// 缩放比例，不小于 0.1，默认 1.0
    #[arg(short = 'z', long = "zoom", value_name = "ZOOM")]
    pub zoom: Option<f32>,

    /// 每页输出单独的 HTML 文件，默认 true
    #[arg(short = 's', long = "separate", value_name = "BOOL", value_parser = parse_separate)]
    pub separate: Option<bool>,

    /// 每批最多页数，默认 6
    #[arg(short = 'b', long = "batch-size", value_name = "PAGES")]
    pub batch_size: Option<u32>,

    /// 生成 POSIX shell 脚本（等同于 --platform posix）
    #[arg(short = 'l', long = "linux", conflicts_with = "platform")]
    pub linux: bool,

    /// 脚本平台，默认与当前系统一致
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// 渲染程序路径，相对路径按工作目录解析
    #[arg(long, value_name = "PATH")]
    pub renderer: Option<PathBuf>,

    /// 工作目录，默认当前目录
    #[arg(short = 'C', long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 按 默认值 → 配置文件 → 环境变量 → 命令行 的顺序构建配置
    pub fn into_config(self) -> AppResult<Config> {
        let work_dir = match self.work_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| AppError::io(".", e))?,
        };

        let mut config = Config {
            work_dir,
            manifest_path: self.manifest,
            source_pdf: self.source_pdf,
            ..Default::default()
        };
        if let Some(path) = &self.config {
            let path = config.resolve(path);
            config = config.apply_file(&path)?;
        }
        config = config.apply_env()?;

        if let Some(v) = self.threads {
            config.worker_count = v;
        }
        if let Some(v) = self.zoom {
            config.zoom = v;
        }
        if let Some(v) = self.separate {
            config.separate_files = v;
        }
        if let Some(v) = self.batch_size {
            config.max_pages_per_batch = v;
        }
        if self.linux {
            config.platform = Platform::Posix;
        } else if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(renderer) = self.renderer {
            config.renderer = Some(renderer);
        }
        config.verbose_logging |= self.verbose;

        Ok(config)
    }
}

fn parse_separate(value: &str) -> Result<bool, String> {
    config::parse_bool(value).ok_or_else(|| format!("'{}' 不是布尔值 (true/false/1/0)", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdf2html-batch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let cli = parse(&[
            "chapters.txt", "book.pdf", "-t", "4", "-z", "150", "-s", "0", "-b", "10", "-l", "-C", "/tmp",
        ]);
        let config = cli.into_config().unwrap();

        assert_eq!(config.worker_count, 4);
        assert_eq!(config.zoom, 150.0);
        assert!(!config.separate_files);
        assert_eq!(config.max_pages_per_batch, 10);
        assert_eq!(config.platform, Platform::Posix);
        assert_eq!(config.work_dir, PathBuf::from("/tmp"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_threads_fail_validation() {
        let config = parse(&["chapters.txt", "book.pdf", "-t", "51", "-C", "/tmp"])
            .into_config()
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration { ref flag, .. }) if flag == "-t/--threads"
        ));
    }

    #[test]
    fn test_unparsable_values_rejected() {
        assert!(Cli::try_parse_from(["x", "a.txt", "b.pdf", "-t", "eight"]).is_err());
        assert!(Cli::try_parse_from(["x", "a.txt", "b.pdf", "-s", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["x", "a.txt", "b.pdf", "-l", "--platform", "windows"]).is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["x", "a.txt"]).is_err());
    }
}
