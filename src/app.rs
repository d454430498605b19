//! 应用层：持有浏览器资源，调度各个流程

use crate::browser::launch_headless_browser;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::PageSession;
use crate::models::{RenderStats, Resolution};
use crate::services::snapshot::SnapshotOptions;
use crate::services::{BrowserResolver, SnapshotService};
use crate::workflow::{ConvertFlow, RenderRequest};
use anyhow::Result;
use chromiumoxide::Browser;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 应用主结构
///
/// 一次调用对应一个浏览器和一个页面。浏览器是稀缺资源，
/// 成功和失败路径都必须走 `shutdown()` 释放。
pub struct App {
    config: Config,
    browser: Browser,
    handler_task: JoinHandle<()>,
    session: PageSession,
}

impl App {
    /// 解析浏览器、启动并导航到目标 URL
    pub async fn initialize(config: Config, url: &str) -> Result<Self> {
        log_startup(&config);

        let resolver = BrowserResolver::new(&config);
        let resolution = resolver.resolve().await?;
        log_resolution(&resolution);

        let executable = match resolution.executable() {
            Some(path) => path.to_path_buf(),
            None => return Err(AppError::no_browser_found().into()),
        };

        let (browser, handler_task, page) = launch_headless_browser(&executable, url).await?;

        Ok(Self {
            config,
            browser,
            handler_task,
            session: PageSession::new(page),
        })
    }

    /// 执行文档转换流程
    pub async fn convert(&self, request: &RenderRequest) -> Result<RenderStats> {
        let flow = ConvertFlow::new(&self.config);
        flow.run(&self.session, request).await
    }

    /// 执行截图流程
    pub async fn snapshot(&self, options: &SnapshotOptions, output: &Path) -> Result<u64> {
        let session = &self.session;
        session.wait_until_ready(std::time::Duration::from_secs(10)).await?;
        SnapshotService::new().capture(session, options, output).await
    }

    /// 关闭浏览器并回收事件处理任务
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("⚠️ 等待浏览器退出失败: {}", e);
        }
        self.handler_task.abort();
        info!("🧹 浏览器已关闭");
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - HTML 分页渲染");
    info!("📊 期望修订号: {}", config.expected_revision);
    info!("{}", "=".repeat(60));
}

fn log_resolution(resolution: &Resolution) {
    match resolution {
        Resolution::Ok { path } => {
            info!("✓ 浏览器: {}", path.display());
        }
        Resolution::Fallback {
            candidate,
            distance,
        } => {
            if *distance == u32::MAX {
                warn!("⚠️ 使用修订号未知的候选浏览器: {}", candidate);
            } else {
                warn!("⚠️ 使用回退浏览器: {} (距离 {})", candidate, distance);
            }
        }
        Resolution::Installed { path } => {
            info!("✅ 已补装浏览器: {}", path.display());
        }
        Resolution::Missing { searched } => {
            warn!("⚠️ 未找到浏览器，检查过的位置:");
            for location in searched {
                warn!("  - {}", location);
            }
        }
    }
}
