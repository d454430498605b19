//! PDF 导出服务 - 业务能力层
//!
//! 职责：
//! - 把当前页面按固定纸张格式打印为 PDF
//! - 写出文件并报告字节数

use crate::infrastructure::PageSession;
use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use std::path::Path;
use tracing::{debug, info};

/// Letter 纸张宽度（英寸）
const PAPER_WIDTH_IN: f64 = 8.5;

/// Letter 纸张高度（英寸）
const PAPER_HEIGHT_IN: f64 = 11.0;

/// 导出缩放修正
///
/// 实测不加修正时打印结果比屏幕渲染大一圈，0.8 是试出来的
/// 经验值，根因未查明。
const EXPORT_SCALE: f64 = 0.8;

/// PDF 导出服务
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    /// 将页面打印为 PDF 并写入指定路径
    ///
    /// # 返回
    /// 写出的字节数
    pub async fn export(&self, session: &PageSession, output: &Path) -> Result<u64> {
        debug!(
            "📄 打印参数: {}in x {}in, 缩放 {}",
            PAPER_WIDTH_IN, PAPER_HEIGHT_IN, EXPORT_SCALE
        );

        let params = PrintToPdfParams::builder()
            .paper_width(PAPER_WIDTH_IN)
            .paper_height(PAPER_HEIGHT_IN)
            .margin_top(0.0)
            .margin_bottom(0.0)
            .margin_left(0.0)
            .margin_right(0.0)
            .print_background(true)
            .prefer_css_page_size(false)
            .scale(EXPORT_SCALE)
            .build();

        let bytes = session
            .page()
            .pdf(params)
            .await
            .context("浏览器打印 PDF 失败")?;

        tokio::fs::write(output, &bytes)
            .await
            .with_context(|| format!("写入 PDF 失败: {}", output.display()))?;

        info!("💾 PDF 已写入: {} ({} 字节)", output.display(), bytes.len());
        Ok(bytes.len() as u64)
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new()
    }
}
