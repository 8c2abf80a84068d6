//! 脚本调度器 - 编排层
//!
//! ## 职责
//!
//! 在固定大小的工作池中并发执行批次脚本，等待全部完成后返回结果。
//!
//! ## 核心规则
//!
//! 1. **并发控制**：Semaphore 限制同时运行的子进程数量
//! 2. **故障隔离**：单个脚本失败只产生一条失败结果，不影响其他脚本
//! 3. **无条件清理**：脚本执行后无论成功与否都会被删除
//! 4. **单一屏障**：等待所有任务结束；等待期间被中断视为整次运行失败

use crate::error::{AppError, AppResult};
use crate::infrastructure::ScriptRunner;
use crate::services::BatchScript;
use futures::future::join_all;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 单个脚本的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// 退出码为 0
    Succeeded,
    /// 非零退出码，被信号终止时为 `None`
    Failed { exit_code: Option<i32> },
    /// 无法启动子进程
    LaunchFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub script: BatchScript,
    pub outcome: JobOutcome,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.outcome == JobOutcome::Succeeded
    }

    /// 失败结果转换为错误，便于统一记录
    pub fn to_error(&self) -> Option<AppError> {
        let status = match &self.outcome {
            JobOutcome::Succeeded => return None,
            JobOutcome::Failed {
                exit_code: Some(code),
            } => format!("退出码 {}", code),
            JobOutcome::Failed { exit_code: None } => "进程被信号终止".to_string(),
            JobOutcome::LaunchFailed { reason } => format!("无法启动: {}", reason),
        };
        Some(AppError::JobExecution {
            script: self.script.file_name(),
            status,
        })
    }
}

/// 脚本调度器
pub struct Dispatcher<R: ScriptRunner> {
    runner: Arc<R>,
    worker_count: usize,
}

impl<R: ScriptRunner> Dispatcher<R> {
    pub fn new(runner: R, worker_count: usize) -> Self {
        Self {
            runner: Arc::new(runner),
            worker_count: worker_count.max(1),
        }
    }

    /// 执行所有脚本，Ctrl-C 视为中断
    pub async fn run_all(&self, scripts: Vec<BatchScript>) -> AppResult<Vec<ExecutionResult>> {
        self.run_until(scripts, async {
            if tokio::signal::ctrl_c().await.is_err() {
                // 无法监听信号时永不中断
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// 扫描目录中符合命名规则的脚本并执行，其他文件忽略
    pub async fn run_dir(&self, scripts_dir: &Path) -> AppResult<Vec<ExecutionResult>> {
        let scripts = discover_scripts(scripts_dir).await?;
        self.run_all(scripts).await
    }

    /// 执行所有脚本，直到全部完成或 `interrupt` 先完成
    ///
    /// 被中断时正在运行的子进程被终止，尚未开始和被终止的脚本都保留在磁盘上。
    pub async fn run_until<F>(
        &self,
        scripts: Vec<BatchScript>,
        interrupt: F,
    ) -> AppResult<Vec<ExecutionResult>>
    where
        F: Future<Output = ()>,
    {
        if scripts.is_empty() {
            info!("没有需要执行的脚本");
            return Ok(Vec::new());
        }

        info!(
            "🚀 开始执行 {} 个脚本，最大并发数: {}",
            scripts.len(),
            self.worker_count
        );

        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let mut handles = Vec::with_capacity(scripts.len());

        for script in scripts {
            let semaphore = semaphore.clone();
            let runner = self.runner.clone();
            let task_script = script.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return launch_failed(task_script, e.to_string()),
                };
                execute(&*runner, task_script).await
            });
            handles.push((script, handle));
        }

        let abort_handles: Vec<_> = handles.iter().map(|(_, h)| h.abort_handle()).collect();
        let barrier = join_all(handles.into_iter().map(|(script, handle)| async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("[{}] 任务执行失败: {}", script.file_name(), e);
                    launch_failed(script, e.to_string())
                }
            }
        }));

        tokio::select! {
            results = barrier => {
                log_dispatch_complete(&results);
                Ok(results)
            }
            _ = interrupt => {
                for handle in abort_handles {
                    handle.abort();
                }
                error!("❌ 等待脚本执行时被中断，未执行的脚本保留在原处");
                Err(AppError::DispatchInterrupted("收到中断信号".to_string()))
            }
        }
    }
}

/// 执行单个脚本并删除它
async fn execute<R: ScriptRunner + ?Sized>(runner: &R, script: BatchScript) -> ExecutionResult {
    let working_dir = script
        .path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    info!("▶ 开始 {}", script.file_name());
    let outcome = match runner.run(&script.path, &working_dir).await {
        Ok(Some(0)) => JobOutcome::Succeeded,
        Ok(exit_code) => JobOutcome::Failed { exit_code },
        Err(e) => JobOutcome::LaunchFailed {
            reason: e.to_string(),
        },
    };

    if let Err(e) = tokio::fs::remove_file(&script.path).await {
        warn!("⚠️ 无法删除脚本 {}: {}", script.path.display(), e);
    }

    let result = ExecutionResult { script, outcome };
    match result.to_error() {
        None => info!("✓ 完成 {}", result.script.file_name()),
        Some(e) => error!("❌ {}", e),
    }
    result
}

fn launch_failed(script: BatchScript, reason: String) -> ExecutionResult {
    ExecutionResult {
        script,
        outcome: JobOutcome::LaunchFailed { reason },
    }
}

/// 扫描目录中的批次脚本，按文件名排序
pub async fn discover_scripts(scripts_dir: &Path) -> AppResult<Vec<BatchScript>> {
    if !scripts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut scripts = Vec::new();
    let mut entries = tokio::fs::read_dir(scripts_dir)
        .await
        .map_err(|e| AppError::io(scripts_dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::io(scripts_dir, e))?
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match BatchScript::from_path(&path) {
            Some(script) => scripts.push(script),
            None => tracing::debug!("忽略非脚本文件: {}", path.display()),
        }
    }

    scripts.sort_by_key(|s| (s.target.index(), s.batch_part));
    Ok(scripts)
}

fn log_dispatch_complete(results: &[ExecutionResult]) {
    let success = results.iter().filter(|r| r.is_success()).count();
    info!(
        "✓ 脚本执行完成: 成功 {}/{}，失败 {}",
        success,
        results.len(),
        results.len() - success
    );
}
