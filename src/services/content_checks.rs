//! 内容启发式检查 - 业务能力层
//!
//! 职责：
//! - 检测打印管线不支持的 CSS 页码计数器用法
//! - 检测内容溢出页面边界的页
//! - 所有检查只产生警告，永远不让转换失败

use crate::infrastructure::PageSession;
use regex::Regex;
use tracing::{debug, warn};

/// 检查结果汇总
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentReport {
    /// 文档里出现了 CSS 页码计数器
    pub counter_usage: bool,
    /// 内容溢出边界的页数
    pub overflow_count: u32,
}

/// 统计溢出页数的 JS
///
/// 允许 1px 误差，避免亚像素取整造成误报。
const OVERFLOW_COUNT_JS: &str = r#"
(() => {
    const pages = document.querySelectorAll('.pagedjs_page');
    let overflow = 0;
    for (const page of pages) {
        const box = page.querySelector('.pagedjs_page_content') || page;
        if (box.scrollHeight > box.clientHeight + 1 || box.scrollWidth > box.clientWidth + 1) {
            overflow += 1;
        }
    }
    return overflow;
})()
"#;

/// 内容检查服务
pub struct ContentChecks;

impl ContentChecks {
    pub fn new() -> Self {
        Self
    }

    /// 对当前页面执行全部检查
    ///
    /// 检查本身失败时只发出警告并返回默认值。
    pub async fn run(&self, session: &PageSession) -> ContentReport {
        let counter_usage = match session.content().await {
            Ok(html) => {
                let found = detect_counter_usage(&html);
                if found {
                    warn!("⚠️ 文档使用了 CSS 页码计数器，打印管线不支持，页码可能缺失");
                }
                found
            }
            Err(e) => {
                warn!("⚠️ 读取页面内容失败，跳过计数器检查: {:#}", e);
                false
            }
        };

        let overflow_count = match session.eval_as::<u32>(OVERFLOW_COUNT_JS).await {
            Ok(count) => {
                if count > 0 {
                    warn!("⚠️ 检测到 {} 页内容溢出页面边界", count);
                } else {
                    debug!("✓ 没有检测到内容溢出");
                }
                count
            }
            Err(e) => {
                warn!("⚠️ 溢出检查执行失败，跳过: {:#}", e);
                0
            }
        };

        ContentReport {
            counter_usage,
            overflow_count,
        }
    }
}

impl Default for ContentChecks {
    fn default() -> Self {
        Self::new()
    }
}

/// 检测文档源码里的 CSS 页码计数器用法
pub fn detect_counter_usage(html: &str) -> bool {
    Regex::new(r"target-counter\s*\(|counter\s*\(\s*pages?\s*\)")
        .map(|re| re.is_match(html))
        .unwrap_or(false)
}
