//! 页面会话 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS / 等待加载 / 注入脚本"的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, warn};

/// 页面就绪轮询间隔
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 页面会话
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 等待文档加载完成
/// - 注入内联 / 远程脚本
/// - 不认识分页流程和导出流程
pub struct PageSession {
    page: Page,
}

impl PageSession {
    /// 创建新的页面会话
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于截图、打印等操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 等待文档加载完成（readyState 到达 complete）
    ///
    /// 超时不视为错误，只发出警告，后续阶段自行兜底。
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<bool> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let state: String = self.eval_as("document.readyState").await?;
            if state == "complete" {
                debug!("📄 文档加载完成");
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                warn!("⚠️ 等待文档加载超时（readyState={}），继续后续流程", state);
                return Ok(false);
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// 注入内联脚本（直接 eval 脚本源码）
    pub async fn inject_inline_script(&self, source: &str) -> Result<()> {
        self.page.evaluate(source.to_string()).await?;
        Ok(())
    }

    /// 注入远程脚本（插入 script 标签并等待其加载结果）
    ///
    /// # 返回
    /// 脚本是否成功加载
    pub async fn inject_remote_script(&self, url: &str) -> Result<bool> {
        let url_json = serde_json::to_string(url)?;
        let js_code = format!(
            r#"
            (async () => {{
                return await new Promise((resolve) => {{
                    const script = document.createElement('script');
                    script.src = {url_json};
                    script.onload = () => resolve(true);
                    script.onerror = () => resolve(false);
                    document.head.appendChild(script);
                }});
            }})()
            "#
        );

        let loaded: bool = self.eval_as(js_code).await?;
        Ok(loaded)
    }

    /// 获取当前页面的完整 HTML
    pub async fn content(&self) -> Result<String> {
        let html = self.page.content().await?;
        Ok(html)
    }
}
