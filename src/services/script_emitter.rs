//! 脚本生成服务 - 业务能力层
//!
//! 只负责"把一个渲染任务写成批次脚本"，不负责执行

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Platform;
use crate::models::{JobTarget, RenderJob};
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, error};

/// 脚本文件名前缀
pub const SCRIPT_PREFIX: &str = "generateHtml";

/// 已写入磁盘的批次脚本
///
/// 由 `ScriptEmitter` 创建，之后归调度器所有，只有调度器会删除它。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScript {
    pub path: PathBuf,
    pub target: JobTarget,
    pub batch_part: u32,
}

impl BatchScript {
    /// 脚本文件名
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// 从文件名识别批次脚本，不符合命名规则的返回 `None`
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let captures = script_name_pattern().captures(name)?;
        let index: i64 = captures[1].parse().ok()?;
        let batch_part: u32 = captures[2].parse().ok()?;
        Some(Self {
            path: path.to_path_buf(),
            target: JobTarget::from_index(index)?,
            batch_part,
        })
    }
}

/// `generateHtml<序号>-<批次><扩展名>`，封面序号为 -1
pub fn script_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^generateHtml(-1|\d+)-(\d+)\.(sh|bat)$").expect("脚本文件名正则无效")
    })
}

/// 脚本文件名
pub fn script_file_name(target: JobTarget, batch_part: u32, platform: Platform) -> String {
    format!(
        "{}{}-{}{}",
        SCRIPT_PREFIX,
        target.index(),
        batch_part,
        platform.script_extension()
    )
}

/// 脚本生成服务
///
/// 职责：
/// - 为每个 `(任务对象, 批次)` 写一个脚本
/// - 同一脚本内的多条渲染命令用平台分隔符连接
/// - 写入失败只跳过当前任务
pub struct ScriptEmitter {
    platform: Platform,
    scripts_dir: PathBuf,
    output_dir: PathBuf,
    renderer: PathBuf,
    source_pdf: PathBuf,
    zoom: String,
}

impl ScriptEmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            platform: config.platform,
            scripts_dir: config.batches_dir(),
            output_dir: config.output_dir(),
            renderer: config.renderer_path(),
            source_pdf: config.source_pdf(),
            zoom: format_zoom(config.zoom),
        }
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// 写入单个任务的脚本，已存在的同名脚本会被覆盖
    pub fn emit(&self, job: &RenderJob) -> AppResult<BatchScript> {
        let path = self
            .scripts_dir
            .join(script_file_name(job.target, job.batch_part, self.platform));
        let write_err = |source| AppError::ScriptWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.scripts_dir).map_err(write_err)?;

        let mut writer = BufWriter::new(File::create(&path).map_err(write_err)?);
        writer
            .write_all(self.render_script(job).as_bytes())
            .and_then(|_| writer.flush())
            .map_err(write_err)?;
        drop(writer);

        mark_executable(&path).map_err(write_err)?;

        debug!("已生成脚本: {}", path.display());
        Ok(BatchScript {
            path,
            target: job.target,
            batch_part: job.batch_part,
        })
    }

    /// 写入所有任务的脚本，失败的任务记录日志后跳过
    pub fn emit_all(&self, jobs: &[RenderJob]) -> Vec<BatchScript> {
        jobs.iter()
            .filter_map(|job| match self.emit(job) {
                Ok(script) => Some(script),
                Err(e) => {
                    error!("[{} 批次 {}] ❌ {}", job.target, job.batch_part, e);
                    None
                }
            })
            .collect()
    }

    /// 脚本文本内容
    pub fn render_script(&self, job: &RenderJob) -> String {
        let dest_dir = match &job.dest_subdir {
            Some(subdir) => self.output_dir.join(subdir),
            None => self.output_dir.clone(),
        };

        let commands: Vec<String> = job
            .invocations()
            .into_iter()
            .map(|(first, last, output)| self.render_command(first, last, &dest_dir, &output))
            .collect();

        let header = match self.platform {
            Platform::Posix => "#!/bin/sh\n",
            Platform::Windows => "@echo off\r\n",
        };
        format!(
            "{}{}\n",
            header,
            commands.join(self.platform.command_separator())
        )
    }

    fn render_command(&self, first: u32, last: u32, dest_dir: &Path, output: &str) -> String {
        let quote = |path: &Path| self.platform.quote(&path.to_string_lossy());
        format!(
            "{} -f {} -l {} --zoom {} --process-outline 0 --dest-dir {} {} {}",
            quote(&self.renderer),
            first,
            last,
            self.zoom,
            quote(dest_dir),
            quote(&self.source_pdf),
            self.platform.quote(output)
        )
    }
}

/// 缩放比例总是带小数点，例如 `1.0`、`1.5`
fn format_zoom(zoom: f32) -> String {
    format!("{:?}", zoom)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
