//! 分页服务 - 业务能力层
//!
//! 职责：
//! - 向页面注入客户端分页脚本（本地优先，CDN 兜底）
//! - 触发分页渲染并轮询页数直到稳定
//! - 只处理单个页面，不关心导出

use crate::config::Config;
use crate::infrastructure::PageSession;
use crate::models::PaginationOutcome;
use crate::utils::logging::truncate_text;
use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 连续多少次采样相同视为稳定
pub const REQUIRED_STABLE_SAMPLES: usize = 3;

/// 分页脚本的 CDN 地址（本地找不到时兜底）
pub const PAGED_POLYFILL_CDN: &str = "https://unpkg.com/pagedjs/dist/paged.polyfill.js";

/// 本地分页脚本文件名
pub const PAGED_POLYFILL_FILENAME: &str = "paged.polyfill.js";

/// 读取已渲染页数的 JS 表达式
const PAGE_COUNT_JS: &str = "document.querySelectorAll('.pagedjs_page').length";

/// 轮询参数
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub max_wait: Duration,
    pub poll_interval: Duration,
    pub required_stable_samples: usize,
}

impl PollOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_wait: Duration::from_millis(config.max_wait_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            required_stable_samples: REQUIRED_STABLE_SAMPLES,
        }
    }
}

/// 一次轮询的结果
#[derive(Debug, Clone, Copy)]
pub struct PollOutcome {
    /// 最后一次采样值
    pub count: u32,
    /// 是否在超时前达到稳定
    pub stable: bool,
    /// 总采样次数
    pub samples: usize,
}

/// 轮询采样函数直到连续若干次返回相同值或超时
///
/// 超时不是错误，返回 `stable: false` 和最后一次采样值；
/// 采样函数本身的错误原样向上传播。
pub async fn wait_for_stable_count<F, Fut>(mut sample: F, opts: &PollOptions) -> Result<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u32>>,
{
    let deadline = tokio::time::Instant::now() + opts.max_wait;
    let mut last: Option<u32> = None;
    let mut streak = 0usize;
    let mut samples = 0usize;

    loop {
        let count = sample().await?;
        samples += 1;

        if last == Some(count) {
            streak += 1;
        } else {
            last = Some(count);
            streak = 1;
        }
        debug!("📊 页数采样 #{}: {} (连续 {} 次)", samples, count, streak);

        if streak >= opts.required_stable_samples {
            return Ok(PollOutcome {
                count,
                stable: true,
                samples,
            });
        }

        if tokio::time::Instant::now() >= deadline {
            return Ok(PollOutcome {
                count,
                stable: false,
                samples,
            });
        }

        tokio::time::sleep(opts.poll_interval).await;
    }
}

/// 分页服务
pub struct PaginationService {
    options: PollOptions,
    script_path: Option<PathBuf>,
}

impl PaginationService {
    pub fn new(config: &Config) -> Self {
        Self {
            options: PollOptions::from_config(config),
            script_path: config.paged_script_path.clone(),
        }
    }

    /// 注入分页脚本、触发渲染并等待页数稳定
    ///
    /// 脚本完全不可用时跳过分页（文档按原样导出），不视为错误。
    pub async fn paginate(&self, session: &PageSession) -> Result<PaginationOutcome> {
        let started = std::time::Instant::now();

        if !self.inject_polyfill(session).await? {
            warn!("⚠️ 分页脚本不可用，跳过分页，按原始文档导出");
            return Ok(PaginationOutcome::skipped());
        }

        self.start_preview(session).await?;

        let outcome = wait_for_stable_count(
            || async move { session.eval_as::<u32>(PAGE_COUNT_JS).await },
            &self.options,
        )
        .await?;

        let elapsed = started.elapsed();
        if outcome.stable {
            info!(
                "✅ 分页稳定: {} 页 (采样 {} 次, 耗时 {}ms)",
                outcome.count,
                outcome.samples,
                elapsed.as_millis()
            );
            if outcome.count == 0 {
                warn!("⚠️ 分页稳定但页数为 0，文档可能没有渲染出内容");
            }
        } else {
            warn!(
                "⚠️ 等待分页超时，以当前状态继续: {} 页 (采样 {} 次)",
                outcome.count, outcome.samples
            );
        }

        Ok(PaginationOutcome {
            pages: outcome.count,
            stable: outcome.stable,
            samples: outcome.samples,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    /// 注入分页脚本
    ///
    /// # 返回
    /// 脚本是否注入成功
    async fn inject_polyfill(&self, session: &PageSession) -> Result<bool> {
        // 本地脚本优先，避免依赖网络
        if let Some(path) = self.local_script_path() {
            info!("📜 注入本地分页脚本: {}", path.display());
            let source = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("读取分页脚本失败: {}", path.display()))?;
            debug!(
                "📜 脚本长度 {} 字符: {}",
                source.len(),
                truncate_text(&source, 80)
            );
            session.inject_inline_script(&source).await?;
            return Ok(true);
        }

        info!("📜 本地没有分页脚本，尝试从 CDN 加载: {}", PAGED_POLYFILL_CDN);
        let loaded = session.inject_remote_script(PAGED_POLYFILL_CDN).await?;
        if !loaded {
            warn!("⚠️ CDN 脚本加载失败");
        }
        Ok(loaded)
    }

    /// 查找本地分页脚本
    ///
    /// 显式指定的路径直接返回（读取失败会报错而不是静默回退），
    /// 否则依次探测程序目录和当前目录下的 assets/。
    fn local_script_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.script_path {
            return Some(path.clone());
        }

        let mut candidates = Vec::new();
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("assets").join(PAGED_POLYFILL_FILENAME));
            }
        }
        candidates.push(PathBuf::from("assets").join(PAGED_POLYFILL_FILENAME));

        candidates.into_iter().find(|p| p.is_file())
    }

    /// 触发分页渲染（不等待渲染完成，由轮询接手）
    async fn start_preview(&self, session: &PageSession) -> Result<()> {
        let started: bool = session
            .eval_as(
                r#"
                (() => {
                    if (window.PagedPolyfill && typeof window.PagedPolyfill.preview === 'function') {
                        window.PagedPolyfill.preview();
                        return true;
                    }
                    return false;
                })()
                "#,
            )
            .await?;

        if started {
            debug!("📄 已触发分页渲染");
        } else {
            warn!("⚠️ 分页脚本已加载但未暴露 preview 接口");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_options() -> PollOptions {
        PollOptions {
            max_wait: Duration::from_millis(5000),
            poll_interval: Duration::from_millis(100),
            required_stable_samples: REQUIRED_STABLE_SAMPLES,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn constant_sequence_stabilizes_immediately() {
        let outcome = wait_for_stable_count(|| async { anyhow::Ok(7u32) }, &fast_options())
            .await
            .unwrap();

        assert!(outcome.stable);
        assert_eq!(outcome.count, 7);
        assert_eq!(outcome.samples, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_last_count_without_stability() {
        let mut counter = 0u32;
        let opts = PollOptions {
            max_wait: Duration::from_millis(450),
            poll_interval: Duration::from_millis(100),
            required_stable_samples: REQUIRED_STABLE_SAMPLES,
        };

        let outcome = wait_for_stable_count(
            || {
                counter += 1;
                let count = counter;
                async move { anyhow::Ok(count) }
            },
            &opts,
        )
        .await
        .unwrap();

        assert!(!outcome.stable);
        assert_eq!(outcome.count, outcome.samples as u32);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_count_still_counts_as_stable() {
        let outcome = wait_for_stable_count(|| async { anyhow::Ok(0u32) }, &fast_options())
            .await
            .unwrap();

        assert!(outcome.stable);
        assert_eq!(outcome.count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sampler_errors_propagate() {
        let result = wait_for_stable_count(
            || async { Err::<u32, anyhow::Error>(anyhow::anyhow!("页面已关闭")) },
            &fast_options(),
        )
        .await;

        assert!(result.is_err());
    }
}
