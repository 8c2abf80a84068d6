//! 日志工具模块
//!
//! 提供各阶段日志输出的辅助函数
use crate::config::Config;
use crate::orchestrator::RunReport;
use std::path::Path;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - PDF 分章节批量渲染");
    info!("📄 源文件: {}", config.source_pdf().display());
    info!("📋 章节清单: {}", config.manifest_path().display());
    info!("🔧 渲染程序: {}", config.renderer_path().display());
    info!(
        "📊 平台: {} | 并发数: {} | 缩放: {} | 每页单独输出: {}",
        config.platform, config.worker_count, config.zoom, config.separate_files
    );
    info!("{}", "=".repeat(60));
}

/// 记录任务规划信息
///
/// # 参数
/// - `chapters`: 章节数量
/// - `jobs`: 任务数量（含封面）
/// - `max_pages`: 每批最大页数
pub fn log_plan(chapters: usize, jobs: usize, max_pages: u32) {
    info!("✓ 找到 {} 个章节", chapters);
    info!("📋 共规划 {} 个批次任务（含封面），每批最多 {} 页", jobs, max_pages);
}

/// 记录脚本生成信息
pub fn log_scripts_emitted(emitted: usize, planned: usize, scripts_dir: &Path) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 已生成 {}/{} 个脚本: {}",
        emitted,
        planned,
        scripts_dir.display()
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded(), report.planned);
    info!("❌ 失败: {}", report.failed());
    info!("{}", "=".repeat(60));
}
