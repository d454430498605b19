//! 命令行接口定义

use crate::config::Config;
use crate::services::snapshot::{
    DEFAULT_SCALE_FACTOR, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// HTML 分页渲染与 PDF 导出工具
#[derive(Debug, Parser)]
#[command(name = "html_to_pdf", version, about = "将 HTML 文档分页渲染并导出为 PDF")]
pub struct Cli {
    /// TOML 配置文件路径
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 将 HTML 文档转换为 PDF
    Convert(ConvertArgs),
    /// 仅执行浏览器解析并打印结果
    Resolve(ResolveArgs),
    /// 将 HTML 文档渲染为 PNG 截图
    Snapshot(SnapshotArgs),
}

/// 浏览器解析相关参数（各子命令共用）
#[derive(Debug, Args)]
pub struct BrowserArgs {
    /// 显式指定浏览器可执行文件（替代期望路径）
    #[arg(long, env = "HTML2PDF_BROWSER", value_name = "PATH")]
    pub browser: Option<PathBuf>,

    /// 找不到浏览器时调用 playwright 安装器补装
    #[arg(long)]
    pub install: bool,

    /// 期望的 Chromium 修订号
    #[arg(long, value_name = "REV")]
    pub revision: Option<u32>,
}

impl BrowserArgs {
    /// 将命令行参数套用到配置上（命令行优先级最高）
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.browser {
            config.browser_path = Some(path.clone());
        }
        if self.install {
            config.install_if_missing = true;
        }
        if let Some(revision) = self.revision {
            config.expected_revision = revision;
        }
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// 输入 HTML 文件
    pub input: PathBuf,

    /// 输出 PDF 文件（默认与输入同名，扩展名换为 .pdf）
    pub output: Option<PathBuf>,

    /// 分页轮询最大等待时间（毫秒）
    #[arg(long, value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// 分页轮询间隔（毫秒）
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// 本地分页脚本路径（默认依次探测程序目录和当前目录的 assets/）
    #[arg(long, env = "HTML2PDF_PAGED_JS", value_name = "FILE")]
    pub paged_script: Option<PathBuf>,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

impl ConvertArgs {
    pub fn apply_to(&self, config: &mut Config) {
        self.browser.apply_to(config);
        if let Some(v) = self.max_wait_ms {
            config.max_wait_ms = v;
        }
        if let Some(v) = self.poll_interval_ms {
            config.poll_interval_ms = v;
        }
        if let Some(path) = &self.paged_script {
            config.paged_script_path = Some(path.clone());
        }
    }

    /// 输出路径（未指定时由输入路径推导）
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("pdf"))
    }
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub browser: BrowserArgs,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// 输入 HTML 文件
    pub input: PathBuf,

    /// 输出 PNG 文件（默认与输入同名，扩展名换为 .png）
    pub output: Option<PathBuf>,

    /// 视口宽度（像素）
    #[arg(long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    pub width: u32,

    /// 视口高度（像素）
    #[arg(long, default_value_t = DEFAULT_VIEWPORT_HEIGHT)]
    pub height: u32,

    /// 设备像素比
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    pub scale: f64,

    #[command(flatten)]
    pub browser: BrowserArgs,
}

impl SnapshotArgs {
    /// 输出路径（未指定时由输入路径推导）
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_derives_output_from_input() {
        let cli = Cli::try_parse_from(["html_to_pdf", "convert", "report.html"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.output_path(), PathBuf::from("report.pdf"));
            }
            other => panic!("应解析为 convert，实际: {:?}", other),
        }
    }

    #[test]
    fn convert_accepts_explicit_output_and_flags() {
        let cli = Cli::try_parse_from([
            "html_to_pdf",
            "convert",
            "report.html",
            "out/final.pdf",
            "--max-wait-ms",
            "5000",
            "--install",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.output_path(), PathBuf::from("out/final.pdf"));
                assert_eq!(args.max_wait_ms, Some(5000));
                assert!(args.browser.install);

                let mut config = Config::default();
                args.apply_to(&mut config);
                assert_eq!(config.max_wait_ms, 5000);
                assert!(config.install_if_missing);
            }
            other => panic!("应解析为 convert，实际: {:?}", other),
        }
    }

    #[test]
    fn snapshot_has_viewport_defaults() {
        let cli = Cli::try_parse_from(["html_to_pdf", "snapshot", "page.html"]).unwrap();
        match cli.command {
            Commands::Snapshot(args) => {
                assert_eq!(args.width, DEFAULT_VIEWPORT_WIDTH);
                assert_eq!(args.height, DEFAULT_VIEWPORT_HEIGHT);
                assert_eq!(args.output_path(), PathBuf::from("page.png"));
            }
            other => panic!("应解析为 snapshot，实际: {:?}", other),
        }
    }

    #[test]
    fn revision_flag_overrides_config() {
        let cli = Cli::try_parse_from(["html_to_pdf", "resolve", "--revision", "1200"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                let mut config = Config::default();
                args.browser.apply_to(&mut config);
                assert_eq!(config.expected_revision, 1200);
            }
            other => panic!("应解析为 resolve，实际: {:?}", other),
        }
    }
}
