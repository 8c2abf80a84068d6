//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量渲染处理器
//! - 启动检查、清单加载、任务规划
//! - 清理输出目录、启动概览写入
//! - 生成脚本并交给调度器
//! - 输出全局统计信息
//!
//! ### `dispatcher` - 脚本调度器
//! - 固定大小的工作池（Semaphore）
//! - 执行脚本、记录退出码、删除脚本
//! - 单一屏障等待全部完成
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Chapter>)
//!     ↓
//! services (能力层：planner / emitter / overview)
//!     ↓
//! dispatcher (处理 Vec<BatchScript>)
//!     ↓
//! infrastructure (基础设施：ShellRunner)
//! ```

pub mod batch_processor;
pub mod dispatcher;

// 重新导出主要类型
pub use batch_processor::{App, RunReport};
pub use dispatcher::{discover_scripts, Dispatcher, ExecutionResult, JobOutcome};
