use crate::error::{AppError, AppResult};
use crate::infrastructure::Platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 脚本输出目录名（相对工作目录）
pub const BATCHES_DIR: &str = "batches";
/// HTML 输出目录名（相对工作目录）
pub const OUTPUT_DIR: &str = "html";

pub const DEFAULT_WORKER_COUNT: usize = 8;
pub const MIN_WORKER_COUNT: usize = 1;
pub const MAX_WORKER_COUNT: usize = 50;
pub const DEFAULT_ZOOM: f32 = 1.0;
pub const MIN_ZOOM: f32 = 0.1;
pub const DEFAULT_SEPARATE_FILES: bool = true;
pub const DEFAULT_PAGES_PER_BATCH: u32 = 6;
pub const MAX_PAGES_PER_BATCH: u32 = 1000;

/// 程序配置
///
/// 启动时构建一次，之后只以引用方式传给各个组件。
#[derive(Clone, Debug)]
pub struct Config {
    /// 工作目录，`lib/`、`batches/`、`html/` 都相对于它
    pub work_dir: PathBuf,
    /// 章节清单文件 (.txt)
    pub manifest_path: PathBuf,
    /// 源 PDF 文件
    pub source_pdf: PathBuf,
    /// 渲染程序路径，未设置时使用平台默认位置
    pub renderer: Option<PathBuf>,
    /// 脚本运行平台
    pub platform: Platform,
    /// 同时运行的脚本数量
    pub worker_count: usize,
    /// 渲染缩放比例
    pub zoom: f32,
    /// 是否每页输出一个 HTML 文件
    pub separate_files: bool,
    /// 每个批次最多包含的页数
    pub max_pages_per_batch: u32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            manifest_path: PathBuf::new(),
            source_pdf: PathBuf::new(),
            renderer: None,
            platform: Platform::host(),
            worker_count: DEFAULT_WORKER_COUNT,
            zoom: DEFAULT_ZOOM,
            separate_files: DEFAULT_SEPARATE_FILES,
            max_pages_per_batch: DEFAULT_PAGES_PER_BATCH,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workers: Option<usize>,
    pub zoom: Option<f32>,
    pub separate: Option<bool>,
    pub batch_size: Option<u32>,
    pub renderer: Option<PathBuf>,
    pub platform: Option<Platform>,
    pub verbose: Option<bool>,
}

impl Config {
    /// 叠加 TOML 配置文件
    pub fn apply_file(mut self, path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| AppError::config("--config", format!("{}: {}", path.display(), e)))?;

        if let Some(v) = file.workers {
            self.worker_count = v;
        }
        if let Some(v) = file.zoom {
            self.zoom = v;
        }
        if let Some(v) = file.separate {
            self.separate_files = v;
        }
        if let Some(v) = file.batch_size {
            self.max_pages_per_batch = v;
        }
        if let Some(v) = file.renderer {
            self.renderer = Some(v);
        }
        if let Some(v) = file.platform {
            self.platform = v;
        }
        if let Some(v) = file.verbose {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    /// 叠加进程环境变量
    pub fn apply_env(self) -> AppResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// 从给定的查找函数叠加环境变量，解析失败视为配置错误
    pub fn apply_env_from<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PDF2HTML_WORKERS") {
            self.worker_count = parse_env("PDF2HTML_WORKERS", &v)?;
        }
        if let Some(v) = lookup("PDF2HTML_ZOOM") {
            self.zoom = parse_env("PDF2HTML_ZOOM", &v)?;
        }
        if let Some(v) = lookup("PDF2HTML_SEPARATE") {
            self.separate_files =
                parse_bool(&v).ok_or_else(|| AppError::config("PDF2HTML_SEPARATE", format!("'{}' 不是布尔值", v)))?;
        }
        if let Some(v) = lookup("PDF2HTML_BATCH_SIZE") {
            self.max_pages_per_batch = parse_env("PDF2HTML_BATCH_SIZE", &v)?;
        }
        if let Some(v) = lookup("PDF2HTML_RENDERER") {
            self.renderer = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("PDF2HTML_PLATFORM") {
            self.platform = v.parse().map_err(|e: String| AppError::config("PDF2HTML_PLATFORM", e))?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging =
                parse_bool(&v).ok_or_else(|| AppError::config("VERBOSE_LOGGING", format!("'{}' 不是布尔值", v)))?;
        }
        Ok(self)
    }

    /// 校验取值范围
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_WORKER_COUNT..=MAX_WORKER_COUNT).contains(&self.worker_count) {
            return Err(AppError::config(
                "-t/--threads",
                format!(
                    "取值 {} 必须在 [{}, {}] 范围内",
                    self.worker_count, MIN_WORKER_COUNT, MAX_WORKER_COUNT
                ),
            ));
        }
        if !self.zoom.is_finite() || self.zoom < MIN_ZOOM {
            return Err(AppError::config(
                "-z/--zoom",
                format!("取值 {} 必须不小于 {}", self.zoom, MIN_ZOOM),
            ));
        }
        if !(1..=MAX_PAGES_PER_BATCH).contains(&self.max_pages_per_batch) {
            return Err(AppError::config(
                "-b/--batch-size",
                format!(
                    "取值 {} 必须在 [1, {}] 范围内",
                    self.max_pages_per_batch, MAX_PAGES_PER_BATCH
                ),
            ));
        }
        Ok(())
    }

    /// 相对路径按工作目录解析
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }

    pub fn renderer_path(&self) -> PathBuf {
        match &self.renderer {
            Some(path) => self.resolve(path),
            None => self.work_dir.join(self.platform.default_renderer()),
        }
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.work_dir.join(BATCHES_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join(OUTPUT_DIR)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest_path)
    }

    pub fn source_pdf(&self) -> PathBuf {
        self.resolve(&self.source_pdf)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(name, format!("无法解析取值 '{}'", value)))
}

/// 解析布尔值，接受 true/false、1/0、yes/no
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
