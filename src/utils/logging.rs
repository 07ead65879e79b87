/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunSummary;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 info，`verbose` 为 true 时 debug。
/// 重复调用不会报错（测试里可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 产品数据表提取");
    info!("🤖 模型: {}", config.llm_model_name);
    info!("📤 输出文件: {}", config.output_file);
    info!("🧭 失败策略: {:?}", config.failure_policy);
    info!("{}", "=".repeat(60));
}

/// 记录扫描结果
pub fn log_files_found(total: usize, dir: &str) {
    info!("✓ 在 {} 中找到 {} 个待处理的文件", dir, total);
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.processed, summary.total);
    info!("⏭️ 跳过: {}", summary.skipped.len());
    for skipped in &summary.skipped {
        info!("   - {}: {}", skipped.file, truncate_text(&skipped.reason, 120));
    }
    info!("{}", "=".repeat(60));
    info!("\n数据集已保存至: {} ({} 行)", config.output_file, summary.written);
    if !summary.skipped.is_empty() {
        info!("跳过报告: {}", config.skip_report_file);
    }
}

/// 单个文件完成后的进度行
///
/// 调用方直接写到 stdout，`RUST_LOG=warn` 时也能看到进度。
pub fn progress_notice(file: &str) -> String {
    format!("✓ 已处理文件 {}", file)
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("XK-100", 10), "XK-100");
        assert_eq!(truncate_text("Lebensdauer", 4), "Lebe...");
        assert_eq!(truncate_text("Kühlung", 2), "Kü...");
    }

    #[test]
    fn test_progress_notice_names_file() {
        assert_eq!(progress_notice("XK-100.pdf"), "✓ 已处理文件 XK-100.pdf");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
