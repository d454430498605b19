use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// 候选可执行文件的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// 默认安装路径（期望路径）
    DefaultInstall,
    /// 环境变量覆盖
    EnvOverride,
    /// 浏览器缓存目录
    Cache,
    /// 系统安装位置
    SystemPackage,
}

impl Provenance {
    /// 用于日志显示的标签
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::DefaultInstall => "默认安装",
            Provenance::EnvOverride => "环境变量",
            Provenance::Cache => "缓存目录",
            Provenance::SystemPackage => "系统安装",
        }
    }
}

/// 候选浏览器可执行文件
///
/// 不变量：进入评分阶段的候选必须真实存在且可执行
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    /// 可执行文件路径
    pub path: PathBuf,
    /// 从路径中提取的修订号（提取不到时为 None）
    pub revision: Option<u32>,
    /// 来源标记
    pub provenance: Provenance,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, revision: Option<u32>, provenance: Provenance) -> Self {
        Self {
            path: path.into(),
            revision,
            provenance,
        }
    }

    /// 按与期望修订号的距离评分，分数越低越好
    ///
    /// 提取不到修订号的候选得最差分
    pub fn score(&self, expected_revision: u32) -> u32 {
        match self.revision {
            Some(revision) => revision.abs_diff(expected_revision),
            None => u32::MAX,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(revision) => write!(
                f,
                "{} (修订号 {}, {})",
                self.path.display(),
                revision,
                self.provenance.label()
            ),
            None => write!(
                f,
                "{} (修订号未知, {})",
                self.path.display(),
                self.provenance.label()
            ),
        }
    }
}

/// 浏览器解析结果
///
/// 每次调用重新计算，不做任何持久化
#[derive(Debug, Clone)]
pub enum Resolution {
    /// 期望路径直接命中
    Ok { path: PathBuf },
    /// 期望路径缺失，使用评分最优的候选
    Fallback { candidate: Candidate, distance: u32 },
    /// 通过安装器补装后命中期望路径
    Installed { path: PathBuf },
    /// 找不到任何可用的浏览器
    Missing { searched: Vec<String> },
}

impl Resolution {
    /// 解析出的可执行文件路径（Missing 时为 None）
    pub fn executable(&self) -> Option<&Path> {
        match self {
            Resolution::Ok { path } | Resolution::Installed { path } => Some(path),
            Resolution::Fallback { candidate, .. } => Some(&candidate.path),
            Resolution::Missing { .. } => None,
        }
    }

    /// 状态标签（用于 stdout 输出）
    pub fn status(&self) -> &'static str {
        match self {
            Resolution::Ok { .. } => "ok",
            Resolution::Fallback { .. } => "fallback",
            Resolution::Installed { .. } => "installed",
            Resolution::Missing { .. } => "missing",
        }
    }
}
