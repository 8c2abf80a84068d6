//! 渲染任务
//!
//! 一个任务对应一个批次脚本，覆盖一段连续页码。

use std::fmt::Display;
use std::path::PathBuf;

/// 封面在脚本文件名中使用的哨兵序号
pub const COVER_INDEX: i64 = -1;

/// 任务对象：封面或某个章节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobTarget {
    Cover,
    Chapter(usize),
}

impl JobTarget {
    /// 脚本文件名中使用的序号
    pub fn index(self) -> i64 {
        match self {
            JobTarget::Cover => COVER_INDEX,
            JobTarget::Chapter(index) => index as i64,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            COVER_INDEX => Some(JobTarget::Cover),
            i if i >= 0 => Some(JobTarget::Chapter(i as usize)),
            _ => None,
        }
    }
}

impl Display for JobTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobTarget::Cover => write!(f, "封面"),
            JobTarget::Chapter(index) => write!(f, "章节 {}", index),
        }
    }
}

/// 输出文件命名方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNaming {
    /// 整段页码输出到一个文件
    Single(String),
    /// 每页一个文件，文件名为 `index_base + 页偏移`
    PerPage { index_base: u32 },
}

/// 渲染任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub target: JobTarget,
    pub start_page: u32,
    pub end_page: u32,
    /// 章节内的批次序号（从 1 开始）
    pub batch_part: u32,
    pub output: OutputNaming,
    /// 相对输出目录的子目录，`None` 表示直接写入输出目录
    pub dest_subdir: Option<PathBuf>,
}

impl RenderJob {
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    /// 本任务的渲染调用：`(起始页, 结束页, 输出文件名)`
    pub fn invocations(&self) -> Vec<(u32, u32, String)> {
        match &self.output {
            OutputNaming::Single(name) => vec![(self.start_page, self.end_page, name.clone())],
            OutputNaming::PerPage { index_base } => (self.start_page..=self.end_page)
                .enumerate()
                .map(|(offset, page)| (page, page, format!("{}.html", index_base + offset as u32)))
                .collect(),
        }
    }
}
