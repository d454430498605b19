//! 渲染请求上下文
//!
//! 封装"把哪个文件转成哪个文件"这一信息

use crate::error::AppError;
use crate::utils::fs::to_file_url;
use anyhow::Result;
use std::fmt::Display;
use std::path::PathBuf;

/// 渲染请求
///
/// 包含处理单个文档所需的全部上下文信息
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// 输入 HTML 文件
    pub input: PathBuf,

    /// 输出文件
    pub output: PathBuf,
}

impl RenderRequest {
    /// 创建新的渲染请求
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    /// 校验输入文件存在并返回它的 file:// URL
    ///
    /// 必须在任何浏览器操作之前调用，输入缺失时直接报错。
    pub fn validate(&self) -> Result<String> {
        if !self.input.is_file() {
            return Err(AppError::input_not_found(&self.input).into());
        }
        to_file_url(&self.input)
    }
}

impl Display for RenderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[输入#{} 输出#{}]",
            self.input.display(),
            self.output.display()
        )
    }
}
