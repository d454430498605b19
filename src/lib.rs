//! # Html To Pdf
//!
//! 把 HTML 文档分页渲染并导出为 PDF 的命令行工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageSession` - 唯一的 page owner，提供 eval() / 等待加载 / 注入脚本能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面
//! - `BrowserResolver` - 定位可用的 Chromium 可执行文件
//! - `PaginationService` - 分页脚本注入与页数稳定性轮询
//! - `ContentChecks` - 页码计数器 / 内容溢出启发式检查
//! - `PdfExporter` - 固定纸张格式打印导出
//! - `SnapshotService` - 固定视口 PNG 截图
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整转换流程
//! - `RenderRequest` - 上下文封装（输入 + 输出）
//! - `ConvertFlow` - 流程编排（加载 → 分页 → 检查 → 导出）
//!
//! ### ④ 应用层（App）
//! - `app` - 资源管理：解析浏览器 → 启动 → 调度流程 → 关闭
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, LaunchFailureKind};
pub use infrastructure::PageSession;
pub use models::{Candidate, PaginationOutcome, Provenance, RenderStats, Resolution};
pub use services::{
    BrowserResolver, ContentChecks, PaginationService, PdfExporter, SnapshotService,
};
pub use workflow::{ConvertFlow, RenderRequest};
