//! # PDF2HTML Batch
//!
//! 按章节清单把 PDF 分批渲染为 HTML 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 平台命令格式与子进程执行，只暴露能力
//! - `ShellRunner` - 通过 `sh` / `cmd` 运行一个脚本并返回退出码
//!
//! ### ② 模型层（Models）
//! - `models/` - `Chapter`、`RenderJob` 以及章节清单加载
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `batch_planner` - 把章节切分为固定页数的批次
//! - `ScriptEmitter` - 把任务写成批次脚本
//! - `OverviewWriter` - 写目录概览 `output.json`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，管理一次完整运行
//! - `orchestrator/dispatcher` - 固定大小工作池执行所有脚本
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Platform, ScriptRunner, ShellRunner};
pub use models::{Chapter, JobTarget, RenderJob};
pub use orchestrator::{App, Dispatcher, ExecutionResult, JobOutcome, RunReport};
pub use services::{plan, BatchScript, OverviewWriter, ScriptEmitter};
