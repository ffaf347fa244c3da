//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式为 `debug`。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件，写入带时间戳的表头
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &Path) -> Result<()> {
    let log_header = format!(
        "{}\n标注重排日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path.display()))?;
    Ok(())
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(annotation: &str, image: &str, dry_run: bool) {
    info!("{}", "=".repeat(60));
    if dry_run {
        info!("🚀 程序启动 - 演练模式（不会改动文件）");
    } else {
        info!("🚀 程序启动 - 按边框面积重排");
    }
    info!("📁 标注: {}", annotation);
    info!("🖼️ 图片: {}", image);
    info!("{}", "=".repeat(60));
}

/// 记录标注加载信息
///
/// # 参数
/// - `total`: 记录总数
/// - `min_area`: 最小面积
/// - `max_area`: 最大面积
pub fn log_records_loaded(total: usize, min_area: i64, max_area: i64) {
    info!("✓ 找到 {} 对待处理的文件", total);
    info!("📐 面积范围: {} ~ {}", min_area, max_area);
}

/// 打印最终统计信息
///
/// # 参数
/// - `total`: 文件对数量
/// - `moved`: 重命名次数
/// - `unchanged`: 序号不变的文件对
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(total: usize, moved: usize, unchanged: usize, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 文件对: {}", total);
    info!("🔀 重命名次数: {}", moved);
    info!("➖ 序号不变: {}", unchanged);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}
