//! 脚本执行器 - 基础设施层
//!
//! 只暴露"运行一个脚本文件并返回退出码"的能力

use crate::infrastructure::Platform;
use futures::future::BoxFuture;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// 脚本执行能力
///
/// 职责：
/// - 在指定工作目录下运行一个脚本
/// - 等待进程结束并返回退出码（被信号终止时为 `None`）
/// - 返回的 future 被丢弃时终止子进程
/// - 不删除脚本，不关心并发
pub trait ScriptRunner: Send + Sync + 'static {
    fn run(&self, script: &Path, working_dir: &Path) -> BoxFuture<'static, io::Result<Option<i32>>>;
}

/// 通过平台命令解释器运行脚本
#[derive(Debug, Clone, Copy)]
pub struct ShellRunner {
    platform: Platform,
}

impl ShellRunner {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl ScriptRunner for ShellRunner {
    fn run(&self, script: &Path, working_dir: &Path) -> BoxFuture<'static, io::Result<Option<i32>>> {
        let platform = self.platform;
        // 工作目录已切换到脚本目录，只传文件名
        let script_arg: PathBuf = script
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| script.to_path_buf());
        let working_dir = working_dir.to_path_buf();

        Box::pin(async move {
            debug!(
                "执行: {} {:?} {}",
                platform.interpreter(),
                platform.interpreter_args(),
                script_arg.display()
            );

            let status = Command::new(platform.interpreter())
                .args(platform.interpreter_args())
                .arg(&script_arg)
                .current_dir(&working_dir)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status()
                .await?;

            Ok(status.code())
        })
    }
}
