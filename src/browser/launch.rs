use std::path::Path;

use crate::error::{AppError, LaunchFailureKind};
use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动无头浏览器并导航到指定 URL
///
/// # 返回
/// 返回 (浏览器, 事件处理任务, 页面)，关闭浏览器后应等待任务结束
pub async fn launch_headless_browser(
    executable: &Path,
    url: &str,
) -> Result<(Browser, JoinHandle<()>, Page)> {
    info!("🚀 启动无头浏览器: {}", executable.display());
    debug!("目标 URL: {}", url);

    // 配置无头浏览器
    let config = BrowserConfig::builder()
        .new_headless_mode()
        .chrome_executable(executable)
        .args(vec![
            "--disable-gpu",             // 无头模式下不需要 GPU
            "--no-sandbox",              // 禁用沙盒，防止容器内权限问题导致的崩溃
            "--disable-dev-shm-usage",   // 防止共享内存不足
            "--remote-debugging-port=0", // 让浏览器自动选择端口
        ])
        .build()
        .map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            anyhow::anyhow!("配置无头浏览器失败: {}", e)
        })?;

    // 启动浏览器，失败时按原因分类
    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| classify_launch_error(&e.to_string()))?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建新页面并导航
    let page = browser.new_page(url).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        anyhow::anyhow!("创建页面失败: {}", e)
    })?;

    info!("✅ 无头浏览器已导航到: {}", url);
    debug!("页面导航成功");

    Ok((browser, handler_task, page))
}

/// 把启动错误按原因分类，附上对应的修复提示
pub fn classify_launch_error(message: &str) -> anyhow::Error {
    let lower = message.to_lowercase();

    let (kind, hint) = if lower.contains("error while loading shared libraries")
        || lower.contains("cannot open shared object file")
    {
        (
            LaunchFailureKind::MissingSharedLibraries,
            "系统缺少浏览器运行库，运行 npx playwright install-deps chromium 安装",
        )
    } else if lower.contains("no such file") || lower.contains("not found") {
        (
            LaunchFailureKind::ExecutableNotFound,
            "可执行文件不存在或不可访问，用 --browser 指定正确路径",
        )
    } else if lower.contains("exec format error") {
        (
            LaunchFailureKind::WrongArchitecture,
            "可执行文件与当前系统架构不匹配，重新安装对应平台的浏览器",
        )
    } else {
        (
            LaunchFailureKind::Other,
            "用 RUST_LOG=debug 重跑查看完整启动日志",
        )
    };

    error!("❌ 浏览器启动失败 ({}): {}", kind.label(), message);
    AppError::BrowserLaunch {
        kind,
        message: message.to_string(),
        hint: hint.to_string(),
    }
    .into()
}
