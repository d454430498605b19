use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认期望的 Playwright Chromium 修订号
pub const DEFAULT_EXPECTED_REVISION: u32 = 1148;

/// 程序配置
///
/// 优先级：默认值 < 配置文件 < 环境变量 < 命令行参数
#[derive(Clone, Debug)]
pub struct Config {
    /// 显式指定的浏览器可执行文件（替代期望路径）
    pub browser_path: Option<PathBuf>,
    /// 期望的浏览器修订号
    pub expected_revision: u32,
    /// 找不到浏览器时是否调用安装器
    pub install_if_missing: bool,
    /// 分页轮询的最大等待时间（毫秒）
    pub max_wait_ms: u64,
    /// 分页轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 本地分页脚本路径
    pub paged_script_path: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_path: None,
            expected_revision: DEFAULT_EXPECTED_REVISION,
            install_if_missing: false,
            max_wait_ms: 30_000,
            poll_interval_ms: 500,
            paged_script_path: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载完整配置（配置文件可选）
    pub async fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = config_file {
            config.apply_file(ConfigFile::load(path).await?);
        }
        config.apply_env();
        Ok(config)
    }

    /// 仅从默认值和环境变量构造配置
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.browser_path {
            self.browser_path = Some(PathBuf::from(v));
        }
        if let Some(v) = file.expected_revision {
            self.expected_revision = v;
        }
        if let Some(v) = file.install_if_missing {
            self.install_if_missing = v;
        }
        if let Some(v) = file.max_wait_ms {
            self.max_wait_ms = v;
        }
        if let Some(v) = file.poll_interval_ms {
            self.poll_interval_ms = v;
        }
        if let Some(v) = file.paged_script_path {
            self.paged_script_path = Some(PathBuf::from(v));
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
    }

    fn apply_env(&mut self) {
        self.expected_revision = std::env::var("HTML2PDF_EXPECTED_REVISION").ok().and_then(|v| v.parse().ok()).unwrap_or(self.expected_revision);
        self.install_if_missing = std::env::var("HTML2PDF_INSTALL").ok().and_then(|v| v.parse().ok()).unwrap_or(self.install_if_missing);
        self.max_wait_ms = std::env::var("HTML2PDF_MAX_WAIT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_wait_ms);
        self.poll_interval_ms = std::env::var("HTML2PDF_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.poll_interval_ms);
        self.verbose_logging = std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging);
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub browser_path: Option<String>,
    pub expected_revision: Option<u32>,
    pub install_if_missing: Option<bool>,
    pub max_wait_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub paged_script_path: Option<String>,
    pub verbose_logging: Option<bool>,
}

impl ConfigFile {
    /// 从 TOML 文件加载
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.expected_revision, DEFAULT_EXPECTED_REVISION);
        assert_eq!(config.max_wait_ms, 30_000);
        assert_eq!(config.poll_interval_ms, 500);
        assert!(!config.install_if_missing);
        assert!(config.browser_path.is_none());
    }

    #[test]
    fn config_file_overrides_only_present_fields() {
        let file: ConfigFile = toml::from_str(
            r#"
            expected_revision = 1200
            max_wait_ms = 5000
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.expected_revision, 1200);
        assert_eq!(config.max_wait_ms, 5000);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn config_file_can_set_paths() {
        let file: ConfigFile = toml::from_str(
            r#"
            browser_path = "/opt/chromium/chrome"
            paged_script_path = "assets/paged.polyfill.js"
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.browser_path, Some(PathBuf::from("/opt/chromium/chrome")));
        assert_eq!(config.paged_script_path, Some(PathBuf::from("assets/paged.polyfill.js")));
    }
}
