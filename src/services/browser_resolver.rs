//! 浏览器解析服务 - 业务能力层
//!
//! 职责：
//! - 定位可用的 Chromium 可执行文件
//! - 按修订号距离给候选打分并选出最佳
//! - 必要时调用外部安装器补装
//! - 不启动浏览器，不关心渲染流程

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Candidate, Provenance, Resolution};
use crate::utils::fs::is_executable;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// playwright 风格缓存目录名
const CACHE_DIR_NAME: &str = "ms-playwright";

/// 缓存根目录的环境变量覆盖
const ENV_BROWSERS_PATH: &str = "PLAYWRIGHT_BROWSERS_PATH";

/// 直接指定候选可执行文件的环境变量（参与打分）
const ENV_CHROMIUM_OVERRIDE: &str = "HTML2PDF_CHROMIUM";

/// 外部安装器命令
const INSTALL_COMMAND: &[&str] = &["npx", "playwright", "install", "chromium"];

/// 浏览器解析器
///
/// 每次调用 `resolve()` 重新计算，结果不做任何持久化。
pub struct BrowserResolver {
    expected_revision: u32,
    explicit_path: Option<PathBuf>,
    install_if_missing: bool,
    cache_roots: Vec<PathBuf>,
    ambient_sources: bool,
}

impl BrowserResolver {
    /// 根据配置创建解析器（使用真实的环境变量和系统目录）
    pub fn new(config: &Config) -> Self {
        Self {
            expected_revision: config.expected_revision,
            explicit_path: config.browser_path.clone(),
            install_if_missing: config.install_if_missing,
            cache_roots: default_cache_roots(),
            ambient_sources: true,
        }
    }

    /// 使用指定的缓存根目录创建解析器，不读取环境变量和系统安装目录
    pub fn with_cache_roots(config: &Config, cache_roots: Vec<PathBuf>) -> Self {
        Self {
            expected_revision: config.expected_revision,
            explicit_path: config.browser_path.clone(),
            install_if_missing: config.install_if_missing,
            cache_roots,
            ambient_sources: false,
        }
    }

    /// 期望的可执行文件路径
    ///
    /// 显式指定的浏览器路径优先，否则按主缓存根目录 + 期望修订号推导。
    pub fn expected_executable(&self) -> PathBuf {
        if let Some(path) = &self.explicit_path {
            return path.clone();
        }
        let root = self
            .cache_roots
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(CACHE_DIR_NAME));
        chromium_executable(&root.join(format!("chromium-{}", self.expected_revision)))
    }

    /// 执行解析流程
    ///
    /// # 返回
    /// 带状态标签的解析结果；只有安装器失败会作为错误返回
    pub async fn resolve(&self) -> Result<Resolution> {
        // ========== 第一步：检查期望路径 ==========
        let expected = self.expected_executable();
        debug!("🔍 检查期望路径: {}", expected.display());

        if is_executable(&expected) {
            if self.explicit_path.is_some() {
                info!("✓ 使用显式指定的浏览器: {}", expected.display());
            } else {
                info!(
                    "✓ 在期望路径找到浏览器 ({}): {}",
                    Provenance::DefaultInstall.label(),
                    expected.display()
                );
            }
            return Ok(Resolution::Ok { path: expected });
        }

        // ========== 第二步：扫描候选并打分 ==========
        let candidates = self.enumerate_candidates();
        debug!("🔍 共收集到 {} 个候选", candidates.len());

        if let Some(best) = candidates
            .iter()
            .min_by_key(|c| c.score(self.expected_revision))
        {
            let distance = best.score(self.expected_revision);
            warn!(
                "⚠️ 期望路径不存在，回退到候选: {} (距离 {})",
                best,
                if distance == u32::MAX {
                    "未知".to_string()
                } else {
                    distance.to_string()
                }
            );
            return Ok(Resolution::Fallback {
                candidate: best.clone(),
                distance,
            });
        }

        // ========== 第三步：尝试安装 ==========
        if self.install_if_missing {
            info!("📦 未找到任何候选，调用安装器: {}", INSTALL_COMMAND.join(" "));
            self.run_installer().await?;

            if is_executable(&expected) {
                info!("✅ 安装完成: {}", expected.display());
                return Ok(Resolution::Installed { path: expected });
            }
            return Err(AppError::install_failed(format!(
                "安装器执行完毕，但期望路径仍不存在: {}",
                expected.display()
            ))
            .into());
        }

        // ========== 第四步：宣告缺失 ==========
        warn!("⚠️ 所有已知位置都没有可用的浏览器");
        Ok(Resolution::Missing {
            searched: self.searched_locations(&expected),
        })
    }

    /// 收集所有存在且可执行的候选
    ///
    /// 顺序：环境变量覆盖 → 各缓存根目录 → 系统安装目录。
    /// 打分相同时按此顺序优先。
    fn enumerate_candidates(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if self.ambient_sources {
            if let Some(path) = std::env::var(ENV_CHROMIUM_OVERRIDE)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
            {
                if is_executable(&path) {
                    let revision = extract_revision(&path);
                    candidates.push(Candidate::new(path, revision, Provenance::EnvOverride));
                } else {
                    warn!(
                        "⚠️ {} 指向的路径不可执行，忽略: {}",
                        ENV_CHROMIUM_OVERRIDE,
                        path.display()
                    );
                }
            }
        }

        for root in &self.cache_roots {
            self.scan_cache_root(root, &mut candidates);
        }

        if self.ambient_sources {
            for path in system_locations() {
                if is_executable(&path) {
                    candidates.push(Candidate::new(path, None, Provenance::SystemPackage));
                }
            }
        }

        candidates
    }

    /// 扫描一个缓存根目录下的 chromium-* 安装
    fn scan_cache_root(&self, root: &Path, candidates: &mut Vec<Candidate>) {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => return, // 目录不存在或不可读，跳过
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with("chromium-") {
                continue;
            }

            let executable = chromium_executable(&entry.path());
            if !is_executable(&executable) {
                continue;
            }

            let revision = extract_revision(&executable);
            debug!(
                "🔍 缓存候选: {} (修订号 {:?})",
                executable.display(),
                revision
            );
            candidates.push(Candidate::new(executable, revision, Provenance::Cache));
        }
    }

    /// 本次解析检查过的所有位置（用于缺失报告）
    fn searched_locations(&self, expected: &Path) -> Vec<String> {
        let mut searched = vec![expected.display().to_string()];
        if self.ambient_sources {
            searched.push(format!("${}", ENV_CHROMIUM_OVERRIDE));
        }
        for root in &self.cache_roots {
            searched.push(root.join("chromium-*").display().to_string());
        }
        if self.ambient_sources {
            for path in system_locations() {
                searched.push(path.display().to_string());
            }
        }
        searched
    }

    /// 同步调用外部安装器并等待其退出
    async fn run_installer(&self) -> Result<()> {
        let status = tokio::process::Command::new(INSTALL_COMMAND[0])
            .args(&INSTALL_COMMAND[1..])
            .status()
            .await
            .with_context(|| format!("无法启动安装器: {}", INSTALL_COMMAND.join(" ")))
            .map_err(|e| AppError::install_failed(format!("{e:#}")))?;

        if !status.success() {
            return Err(AppError::install_failed(format!(
                "安装器退出码非零: {}",
                status
            ))
            .into());
        }
        Ok(())
    }
}

// ========== 平台相关路径 ==========

/// 一个 chromium-<rev> 安装目录下的可执行文件路径
#[cfg(target_os = "linux")]
pub fn chromium_executable(install_dir: &Path) -> PathBuf {
    install_dir.join("chrome-linux").join("chrome")
}

#[cfg(target_os = "macos")]
pub fn chromium_executable(install_dir: &Path) -> PathBuf {
    install_dir
        .join("chrome-mac")
        .join("Chromium.app")
        .join("Contents")
        .join("MacOS")
        .join("Chromium")
}

#[cfg(target_os = "windows")]
pub fn chromium_executable(install_dir: &Path) -> PathBuf {
    install_dir.join("chrome-win").join("chrome.exe")
}

/// 默认缓存根目录列表
///
/// 环境变量覆盖时只用覆盖值；否则是自己的缓存目录加上
/// 其他用户主目录下的缓存目录（多用户机器上常见）。
fn default_cache_roots() -> Vec<PathBuf> {
    if let Some(custom) = std::env::var(ENV_BROWSERS_PATH)
        .ok()
        .filter(|v| !v.is_empty())
    {
        return vec![PathBuf::from(custom)];
    }

    let mut roots = Vec::new();
    if let Some(cache) = dirs::cache_dir() {
        roots.push(cache.join(CACHE_DIR_NAME));
    }
    for home in other_user_homes() {
        let root = user_cache_root(&home);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// 某个用户主目录对应的浏览器缓存根目录
#[cfg(target_os = "linux")]
fn user_cache_root(home: &Path) -> PathBuf {
    home.join(".cache").join(CACHE_DIR_NAME)
}

#[cfg(target_os = "macos")]
fn user_cache_root(home: &Path) -> PathBuf {
    home.join("Library").join("Caches").join(CACHE_DIR_NAME)
}

#[cfg(target_os = "windows")]
fn user_cache_root(home: &Path) -> PathBuf {
    home.join("AppData").join("Local").join(CACHE_DIR_NAME)
}

/// 枚举本机其他用户的主目录
fn other_user_homes() -> Vec<PathBuf> {
    let base = {
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/home")
        }
        #[cfg(target_os = "macos")]
        {
            PathBuf::from("/Users")
        }
        #[cfg(target_os = "windows")]
        {
            PathBuf::from("C:\\Users")
        }
    };

    let mut homes = Vec::new();
    if let Ok(entries) = std::fs::read_dir(&base) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                homes.push(path);
            }
        }
    }

    #[cfg(target_os = "linux")]
    homes.push(PathBuf::from("/root"));

    homes
}

/// 常见的系统安装位置
#[cfg(target_os = "linux")]
fn system_locations() -> Vec<PathBuf> {
    [
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/snap/bin/chromium",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(target_os = "macos")]
fn system_locations() -> Vec<PathBuf> {
    [
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(target_os = "windows")]
fn system_locations() -> Vec<PathBuf> {
    [
        "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
        "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
        "C:\\Program Files (x86)\\Microsoft\\Edge\\Application\\msedge.exe",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// 从路径中提取 chromium 修订号
///
/// 匹配路径里的 `chromium-<数字>` 片段，匹配不到返回 None。
pub fn extract_revision(path: &Path) -> Option<u32> {
    let re = Regex::new(r"chromium-(\d+)").ok()?;
    let text = path.to_string_lossy();
    let caps = re.captures(&text)?;
    caps.get(1)?.as_str().parse().ok()
}
