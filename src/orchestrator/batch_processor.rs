//! 批量渲染处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整渲染的资源和流程。
//!
//! ## 核心功能
//!
//! 1. **启动检查**：校验配置、输入文件和渲染程序，任何失败都在写文件之前终止
//! 2. **清单加载与规划**：读取章节清单，切分批次任务
//! 3. **清理输出**：在任何任务开始之前清空 `batches/` 和 `html/`
//! 4. **概览文件**：后台写入 `output.json`，主流程不等待
//! 5. **生成与调度**：写批次脚本，交给 `Dispatcher` 并发执行
//! 6. **全局统计**：汇总所有脚本的执行结果

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::ShellRunner;
use crate::models::{self, Chapter, RenderJob};
use crate::orchestrator::dispatcher::{Dispatcher, ExecutionResult};
use crate::services::{batch_planner, OverviewWriter, ScriptEmitter};
use crate::utils::logging;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 一次运行的结果
#[derive(Debug)]
pub struct RunReport {
    /// 规划出的任务数量（含封面）
    pub planned: usize,
    /// 成功写入的脚本数量
    pub emitted: usize,
    pub results: Vec<ExecutionResult>,
    /// 概览写入任务，主流程不等待它
    pub overview_task: JoinHandle<()>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// 执行失败的脚本数加上写入失败被跳过的任务数
    pub fn failed(&self) -> usize {
        (self.results.len() - self.succeeded()) + (self.planned - self.emitted)
    }
}

impl App {
    /// 初始化应用
    ///
    /// 只做检查，不写任何文件。
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        check_input_file(&config.manifest_path(), "txt")?;
        check_input_file(&config.source_pdf(), "pdf")?;

        let renderer = config.renderer_path();
        if !renderer.is_file() {
            return Err(AppError::MissingDependency { path: renderer });
        }

        logging::log_startup(&config);
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunReport> {
        // 清单错误是致命的，必须在清理目录之前发现
        let chapters = self.load_chapters().await?;
        let jobs = self.plan_jobs(&chapters)?;

        self.wipe_previous_output()?;

        let overview_task =
            OverviewWriter::new(&self.config.output_dir()).spawn(chapters.clone());

        let emitter = ScriptEmitter::new(&self.config);
        let scripts = emitter.emit_all(&jobs);
        logging::log_scripts_emitted(scripts.len(), jobs.len(), emitter.scripts_dir());

        let dispatcher = Dispatcher::new(
            ShellRunner::new(self.config.platform),
            self.config.worker_count,
        );
        let results = dispatcher.run_all(scripts.clone()).await?;

        let report = RunReport {
            planned: jobs.len(),
            emitted: scripts.len(),
            results,
            overview_task,
        };
        logging::print_final_stats(&report);

        Ok(report)
    }

    /// 加载章节清单
    async fn load_chapters(&self) -> AppResult<Vec<Chapter>> {
        info!("📁 正在读取章节清单...");
        let chapters = models::load_manifest(&self.config.manifest_path()).await?;
        if chapters.is_empty() {
            warn!("⚠️ 章节清单为空，只渲染封面");
        }
        Ok(chapters)
    }

    fn plan_jobs(&self, chapters: &[Chapter]) -> AppResult<Vec<RenderJob>> {
        let jobs = batch_planner::plan(
            chapters,
            self.config.max_pages_per_batch,
            self.config.separate_files,
        )?;
        logging::log_plan(chapters.len(), jobs.len(), self.config.max_pages_per_batch);
        Ok(jobs)
    }

    /// 清空上一次的脚本和输出
    fn wipe_previous_output(&self) -> AppResult<()> {
        for dir in [self.config.batches_dir(), self.config.output_dir()] {
            if dir.exists() {
                info!("🗑️ 清理目录: {}", dir.display());
                std::fs::remove_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
            }
            std::fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
        }
        Ok(())
    }
}

/// 检查输入文件存在且扩展名正确（不区分大小写）
fn check_input_file(path: &Path, expected_extension: &str) -> AppResult<()> {
    let extension_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected_extension));
    if !extension_ok {
        return Err(AppError::InputFile {
            path: path.to_path_buf(),
            reason: format!("需要 .{} 文件", expected_extension),
        });
    }
    if !path.is_file() {
        return Err(AppError::InputFile {
            path: path.to_path_buf(),
            reason: "文件不存在".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn workspace() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chapters.txt"), "Intro\n1 5\n").unwrap();
        std::fs::write(dir.path().join("book.PDF"), "%PDF-1.4").unwrap();
        let config = Config {
            work_dir: dir.path().to_path_buf(),
            manifest_path: PathBuf::from("chapters.txt"),
            source_pdf: PathBuf::from("book.PDF"),
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn test_missing_renderer_aborts_before_writing() {
        let (dir, config) = workspace();
        let err = App::initialize(config).err().unwrap();

        assert!(matches!(err, AppError::MissingDependency { .. }));
        assert!(!dir.path().join("batches").exists());
        assert!(!dir.path().join("html").exists());
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let (dir, mut config) = workspace();
        std::fs::write(dir.path().join("chapters.csv"), "").unwrap();
        config.manifest_path = PathBuf::from("chapters.csv");

        assert!(matches!(
            App::initialize(config),
            Err(AppError::InputFile { .. })
        ));
    }

    #[test]
    fn test_missing_source_rejected() {
        let (_dir, mut config) = workspace();
        config.source_pdf = PathBuf::from("other.pdf");

        assert!(matches!(
            App::initialize(config),
            Err(AppError::InputFile { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_first() {
        let (_dir, mut config) = workspace();
        config.worker_count = 0;

        assert!(matches!(
            App::initialize(config),
            Err(AppError::Configuration { .. })
        ));
    }
}
