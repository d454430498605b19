//! 截图服务 - 业务能力层
//!
//! 职责：
//! - 按固定设备参数把页面渲染为 PNG
//! - 背景图生成等场景复用同一套浏览器生命周期

use crate::infrastructure::PageSession;
use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use std::path::Path;
use tracing::{debug, info};

/// 默认视口宽度（A4 比例的 CSS 像素）
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 794;

/// 默认视口高度（A4 比例的 CSS 像素）
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1123;

/// 默认设备像素比（2.0 保证文字和渐变不发虚）
pub const DEFAULT_SCALE_FACTOR: f64 = 2.0;

/// 截图参数
#[derive(Debug, Clone, Copy)]
pub struct SnapshotOptions {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
            scale: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// 截图服务
pub struct SnapshotService;

impl SnapshotService {
    pub fn new() -> Self {
        Self
    }

    /// 按指定设备参数截图并写入 PNG 文件
    ///
    /// # 返回
    /// 写出的字节数
    pub async fn capture(
        &self,
        session: &PageSession,
        options: &SnapshotOptions,
        output: &Path,
    ) -> Result<u64> {
        debug!(
            "📷 视口 {}x{} @ {}x",
            options.width, options.height, options.scale
        );

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(options.width as i64)
            .height(options.height as i64)
            .device_scale_factor(options.scale)
            .mobile(false)
            .build()
            .map_err(|e| anyhow::anyhow!("构造设备参数失败: {}", e))?;

        session
            .page()
            .execute(metrics)
            .await
            .context("设置设备参数失败")?;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();

        let bytes = session
            .page()
            .screenshot(params)
            .await
            .context("页面截图失败")?;

        tokio::fs::write(output, &bytes)
            .await
            .with_context(|| format!("写入 PNG 失败: {}", output.display()))?;

        info!("📷 截图已写入: {} ({} 字节)", output.display(), bytes.len());
        Ok(bytes.len() as u64)
    }
}

impl Default for SnapshotService {
    fn default() -> Self {
        Self::new()
    }
}
