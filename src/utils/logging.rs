/// 日志工具模块
///
/// 提供日志初始化和输出格式化的辅助函数
use crate::models::RenderStats;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 默认 info 级别，可通过 RUST_LOG 环境变量覆盖。
/// 重复调用不报错（测试里会多次初始化）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 本次转换的统计
pub fn log_render_complete(stats: &RenderStats) {
    info!("{}", "=".repeat(60));
    info!("📊 转换完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if stats.stable {
        info!("✅ 页数: {}", stats.pages);
    } else {
        info!("⚠️ 页数: {} (未稳定)", stats.pages);
    }
    if stats.counter_usage {
        info!("⚠️ 文档使用了不支持的 CSS 页码计数器");
    }
    if stats.overflow_count > 0 {
        info!("⚠️ {} 页内容溢出边界", stats.overflow_count);
    }
    info!("💾 输出: {} ({} 字节)", stats.output, stats.bytes);
    info!("⏱️ 耗时: {} 毫秒", stats.duration_ms);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
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
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
    }

    #[test]
    fn truncate_cuts_long_text_by_chars() {
        let text = "一二三四五六七八九十";
        assert_eq!(truncate_text(text, 4), "一二三四...");
    }
}
