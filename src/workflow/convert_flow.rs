//! 文档转换流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整转换流程
//!
//! 流程顺序：
//! 1. 等待文档加载安定
//! 2. 注入分页脚本并等待页数稳定
//! 3. 内容启发式检查（只警告）
//! 4. 打印导出 PDF

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::PageSession;
use crate::models::RenderStats;
use crate::services::{ContentChecks, PaginationService, PdfExporter};
use crate::workflow::render_request::RenderRequest;

/// 等待文档 readyState 的上限
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// 加载完成后的安定延迟，给异步字体和图片一点时间
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// 文档转换流程
///
/// - 编排完整的转换流程
/// - 决定何时分页、何时检查、何时导出
/// - 不持有任何资源（page）
/// - 只依赖业务能力（services）
pub struct ConvertFlow {
    pagination: PaginationService,
    content_checks: ContentChecks,
    exporter: PdfExporter,
}

impl ConvertFlow {
    /// 创建新的转换流程
    pub fn new(config: &Config) -> Self {
        Self {
            pagination: PaginationService::new(config),
            content_checks: ContentChecks::new(),
            exporter: PdfExporter::new(),
        }
    }

    pub async fn run(&self, session: &PageSession, request: &RenderRequest) -> Result<RenderStats> {
        let started = std::time::Instant::now();
        info!("📄 开始转换 {}", request);

        // ========== 阶段 1: 等待文档加载 ==========
        session.wait_until_ready(READY_TIMEOUT).await?;
        sleep(SETTLE_DELAY).await;
        debug!("✓ 文档加载阶段结束");

        // ========== 阶段 2: 分页 ==========
        let pagination = self.pagination.paginate(session).await?;

        // ========== 阶段 3: 内容检查 ==========
        let report = self.content_checks.run(session).await;

        // ========== 阶段 4: 导出 ==========
        let bytes = self.exporter.export(session, &request.output).await?;

        Ok(RenderStats {
            status: "ok",
            input: request.input.display().to_string(),
            output: request.output.display().to_string(),
            pages: pagination.pages,
            stable: pagination.stable,
            counter_usage: report.counter_usage,
            overflow_count: report.overflow_count,
            bytes,
            duration_ms: started.elapsed().as_millis() as u64,
            finished_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}
