//! 目录概览写入服务 - 业务能力层
//!
//! 只负责写 `output.json`，与渲染流程互不依赖

use crate::error::{AppError, AppResult};
use crate::models::Chapter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 概览文件名
pub const OVERVIEW_FILE_NAME: &str = "output.json";

/// 概览文件前缀，前端以 ES module 方式引入
const OVERVIEW_PREFIX: &str = "export var data = ";

#[derive(Debug, Serialize)]
struct Overview<'a> {
    chapters: Vec<OverviewEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct OverviewEntry<'a> {
    title: &'a str,
    path: String,
    #[serde(rename = "numberOfPage")]
    number_of_page: u32,
}

/// 概览写入服务
pub struct OverviewWriter {
    output_path: PathBuf,
}

impl OverviewWriter {
    /// 写入到 `<output_dir>/output.json`
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_path: output_dir.join(OVERVIEW_FILE_NAME),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// 生成概览文本
    pub fn render(chapters: &[Chapter]) -> AppResult<String> {
        let overview = Overview {
            chapters: chapters
                .iter()
                .enumerate()
                .map(|(index, chapter)| OverviewEntry {
                    title: &chapter.name,
                    path: format!("/data/{}", index),
                    number_of_page: chapter.page_count(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&overview)
            .map_err(|e| AppError::io(OVERVIEW_FILE_NAME, e.into()))?;
        Ok(format!("{}{}", OVERVIEW_PREFIX, json))
    }

    /// 同步写入概览文件，目录不存在时自动创建
    pub fn write(&self, chapters: &[Chapter]) -> AppResult<()> {
        let content = Self::render(chapters)?;
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        fs::write(&self.output_path, content).map_err(|e| AppError::io(&self.output_path, e))?;
        Ok(())
    }

    /// 在后台线程写入概览文件
    ///
    /// 主流程不会等待返回的句柄；失败只记录日志。
    /// 阻塞任务在运行时关闭前会被执行完毕。
    pub fn spawn(self, chapters: Vec<Chapter>) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || match self.write(&chapters) {
            Ok(()) => info!("✓ 概览文件写入完成: {}", self.output_path.display()),
            Err(e) => error!("❌ 概览文件写入失败: {}", e),
        })
    }
}
