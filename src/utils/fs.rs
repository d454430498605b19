//! 文件系统辅助函数

use anyhow::{Context, Result};
use std::path::Path;

/// 判断路径是否存在且可执行
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

/// Windows 上没有可执行位，存在即视为可执行
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// 将本地路径转换为 file:// URL
///
/// 路径会先转成绝对路径
pub fn to_file_url(path: &Path) -> Result<String> {
    let absolute = path
        .canonicalize()
        .with_context(|| format!("无法解析输入路径: {}", path.display()))?;

    #[cfg(windows)]
    {
        let text = absolute.display().to_string();
        let text = text.trim_start_matches(r"\\?\").replace('\\', "/");
        Ok(format!("file:///{}", text))
    }
    #[cfg(not(windows))]
    {
        Ok(format!("file://{}", absolute.display()))
    }
}
