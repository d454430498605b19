//! 应用程序错误类型
//!
//! 按领域分组，浏览器相关的错误额外携带面向用户的修复提示

use std::path::PathBuf;
use thiserror::Error;

/// 浏览器启动失败的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchFailureKind {
    /// 缺少系统共享库
    MissingSharedLibraries,
    /// 可执行文件不存在
    ExecutableNotFound,
    /// 可执行文件与当前系统架构不匹配
    WrongArchitecture,
    /// 其他未分类原因
    Other,
}

impl LaunchFailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            LaunchFailureKind::MissingSharedLibraries => "缺少共享库",
            LaunchFailureKind::ExecutableNotFound => "可执行文件不存在",
            LaunchFailureKind::WrongArchitecture => "架构不匹配",
            LaunchFailureKind::Other => "未知原因",
        }
    }
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入文件不存在
    #[error("输入文件不存在: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// 找不到可用的浏览器
    #[error("找不到可用的浏览器: {reason}")]
    BrowserMissing { reason: String, hint: String },

    /// 浏览器启动失败
    #[error("浏览器启动失败 ({}): {message}", .kind.label())]
    BrowserLaunch {
        kind: LaunchFailureKind,
        message: String,
        hint: String,
    },

    /// 浏览器安装失败
    #[error("浏览器安装失败: {message}")]
    InstallFailed { message: String, hint: String },

    /// 其他错误（用于包装第三方库错误）
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 面向用户的修复提示
    pub fn hint(&self) -> Option<&str> {
        match self {
            AppError::BrowserMissing { hint, .. }
            | AppError::BrowserLaunch { hint, .. }
            | AppError::InstallFailed { hint, .. } => Some(hint),
            _ => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建输入文件缺失错误
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        AppError::InputNotFound { path: path.into() }
    }

    /// 创建浏览器缺失错误
    pub fn browser_missing(reason: impl Into<String>, hint: impl Into<String>) -> Self {
        AppError::BrowserMissing {
            reason: reason.into(),
            hint: hint.into(),
        }
    }

    /// 解析流程一无所获时的标准错误
    pub fn no_browser_found() -> Self {
        Self::browser_missing(
            "所有已知位置都没有可用的 Chromium",
            "运行 npx playwright install chromium 安装，或加 --install 让程序自动安装",
        )
    }

    /// 创建安装失败错误
    pub fn install_failed(message: impl Into<String>) -> Self {
        AppError::InstallFailed {
            message: message.into(),
            hint: "检查网络和 Node.js 环境，或手动运行: npx playwright install chromium"
                .to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
