//! 进程退出码
//!
//! 调用方依赖这些数值区分失败类别，不要改动已有取值

use crate::error::AppError;

/// 成功
pub const SUCCESS: i32 = 0;
/// 一般性失败
pub const GENERIC_ERROR: i32 = 1;
/// 输入文件不存在
pub const INPUT_NOT_FOUND: i32 = 2;
/// 浏览器不可用（缺失、启动失败或安装失败）
pub const BROWSER_UNAVAILABLE: i32 = 3;

/// 将错误映射为退出码
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InputNotFound { .. }) => INPUT_NOT_FOUND,
        Some(AppError::BrowserMissing { .. })
        | Some(AppError::BrowserLaunch { .. })
        | Some(AppError::InstallFailed { .. }) => BROWSER_UNAVAILABLE,
        _ => GENERIC_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchFailureKind;

    #[test]
    fn input_error_maps_to_dedicated_code() {
        let err: anyhow::Error = AppError::input_not_found("/tmp/a.html").into();
        assert_eq!(for_error(&err), INPUT_NOT_FOUND);
    }

    #[test]
    fn browser_errors_share_unavailable_code() {
        let missing: anyhow::Error = AppError::no_browser_found().into();
        assert_eq!(for_error(&missing), BROWSER_UNAVAILABLE);

        let launch: anyhow::Error = AppError::BrowserLaunch {
            kind: LaunchFailureKind::Other,
            message: "boom".to_string(),
            hint: String::new(),
        }
        .into();
        assert_eq!(for_error(&launch), BROWSER_UNAVAILABLE);

        let install: anyhow::Error = AppError::install_failed("npx 不存在").into();
        assert_eq!(for_error(&install), BROWSER_UNAVAILABLE);
    }

    #[test]
    fn plain_errors_are_generic() {
        let err = anyhow::anyhow!("意料之外");
        assert_eq!(for_error(&err), GENERIC_ERROR);
    }
}
