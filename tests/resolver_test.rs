//! 浏览器解析流程测试
//!
//! 用临时目录伪造缓存树，不依赖本机真实的浏览器安装

use html_to_pdf::services::browser_resolver::{chromium_executable, BrowserResolver};
use html_to_pdf::{Config, Provenance, Resolution};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 在指定路径伪造一个可执行文件
fn place_executable(path: &Path) {
    std::fs::create_dir_all(path.parent().expect("应有父目录")).expect("创建目录失败");
    std::fs::write(path, b"#!/bin/sh\nexit 0\n").expect("写入失败");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("设置权限失败");
    }
}

/// 在缓存根目录下伪造一个 chromium-<rev> 安装
fn fake_install(root: &Path, revision: u32) -> PathBuf {
    let exe = chromium_executable(&root.join(format!("chromium-{revision}")));
    place_executable(&exe);
    exe
}

#[tokio::test]
async fn expected_path_resolves_ok() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    let expected = fake_install(cache.path(), config.expected_revision);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Ok { path } => assert_eq!(path, expected),
        other => panic!("应为 Ok，实际: {:?}", other),
    }
}

#[tokio::test]
async fn missing_expected_falls_back_to_cache_candidate() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    let fallback = fake_install(cache.path(), config.expected_revision - 2);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Fallback {
            candidate,
            distance,
        } => {
            assert_eq!(candidate.path, fallback);
            assert_eq!(candidate.revision, Some(config.expected_revision - 2));
            assert_eq!(candidate.provenance, Provenance::Cache);
            assert_eq!(distance, 2);
        }
        other => panic!("应为 Fallback，实际: {:?}", other),
    }
}

#[tokio::test]
async fn closest_revision_wins() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    let near = fake_install(cache.path(), config.expected_revision - 2);
    let _far = fake_install(cache.path(), config.expected_revision + 5);
    // 提取不出修订号的安装按最差分数参与
    let unknown = chromium_executable(&cache.path().join("chromium-nightly"));
    place_executable(&unknown);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Fallback { candidate, .. } => {
            assert_eq!(candidate.path, near, "距离 2 的候选应胜过距离 5 和未知的候选");
        }
        other => panic!("应为 Fallback，实际: {:?}", other),
    }
}

#[tokio::test]
async fn unknown_revision_is_last_resort() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    let only = chromium_executable(&cache.path().join("chromium-nightly"));
    place_executable(&only);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Fallback {
            candidate,
            distance,
        } => {
            assert_eq!(candidate.path, only);
            assert_eq!(candidate.revision, None);
            assert_eq!(distance, u32::MAX);
        }
        other => panic!("应为 Fallback，实际: {:?}", other),
    }
}

#[tokio::test]
async fn candidates_from_any_cache_root_are_considered() {
    let primary = TempDir::new().expect("创建临时目录失败");
    let secondary = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(
        &config,
        vec![primary.path().to_path_buf(), secondary.path().to_path_buf()],
    );

    // 只有第二个根目录里有安装
    let only = fake_install(secondary.path(), config.expected_revision - 1);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Fallback { candidate, .. } => assert_eq!(candidate.path, only),
        other => panic!("应为 Fallback，实际: {:?}", other),
    }
}

#[tokio::test]
async fn empty_cache_reports_missing_with_trail() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Missing { searched } => {
            assert!(!searched.is_empty(), "应记录检查过的位置");
            assert!(
                searched.iter().any(|s| s.contains("chromium-")),
                "检查记录应包含期望路径: {:?}",
                searched
            );
        }
        other => panic!("应为 Missing，实际: {:?}", other),
    }
}

#[tokio::test]
async fn explicit_browser_path_short_circuits() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let custom = dir.path().join("my-chrome");
    place_executable(&custom);

    let mut config = Config::default();
    config.browser_path = Some(custom.clone());
    let resolver = BrowserResolver::with_cache_roots(&config, vec![dir.path().to_path_buf()]);

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Ok { path } => assert_eq!(path, custom),
        other => panic!("应为 Ok，实际: {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn non_executable_files_are_not_candidates() {
    let cache = TempDir::new().expect("创建临时目录失败");
    let config = Config::default();
    let resolver = BrowserResolver::with_cache_roots(&config, vec![cache.path().to_path_buf()]);

    let exe = chromium_executable(
        &cache
            .path()
            .join(format!("chromium-{}", config.expected_revision - 1)),
    );
    std::fs::create_dir_all(exe.parent().expect("应有父目录")).expect("创建目录失败");
    std::fs::write(&exe, b"not a real chrome").expect("写入失败");
    // 故意不设置可执行位

    match resolver.resolve().await.expect("解析不应失败") {
        Resolution::Missing { .. } => {}
        other => panic!("不可执行的文件不应成为候选，实际: {:?}", other),
    }
}
