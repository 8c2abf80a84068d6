use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 启动阶段的错误（清单、配置、依赖、输入文件）是致命的；
/// 单个任务的错误（写脚本、执行脚本）只记录日志，不影响其他任务。
#[derive(Debug, Error)]
pub enum AppError {
    /// 章节清单格式错误
    #[error("章节清单格式错误 (第 {line} 行): {reason}")]
    MalformedManifest { line: usize, reason: String },

    /// 配置参数错误
    #[error("参数 {flag} 无效: {reason}")]
    Configuration { flag: String, reason: String },

    /// 渲染程序不存在
    #[error("找不到渲染程序: {}", path.display())]
    MissingDependency { path: PathBuf },

    /// 输入文件错误
    #[error("输入文件无效 ({}): {reason}", path.display())]
    InputFile { path: PathBuf, reason: String },

    /// 脚本写入失败
    #[error("写入脚本失败 ({}): {source}", path.display())]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 脚本执行失败
    #[error("脚本 {script} 执行失败: {status}")]
    JobExecution { script: String, status: String },

    /// 等待任务完成时被中断
    #[error("等待渲染任务完成时被中断: {0}")]
    DispatchInterrupted(String),

    /// 其他文件操作错误
    #[error("文件操作失败 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建清单格式错误
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        AppError::MalformedManifest {
            line,
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(flag: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Configuration {
            flag: flag.into(),
            reason: reason.into(),
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为启动阶段的致命错误
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::ScriptWrite { .. } | AppError::JobExecution { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
