use serde::Serialize;

/// 分页轮询结果
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaginationOutcome {
    /// 最后观测到的页数
    pub pages: u32,
    /// 是否在超时前达到稳定
    pub stable: bool,
    /// 采样次数
    pub samples: usize,
    /// 轮询耗时（毫秒）
    pub elapsed_ms: u64,
}

impl PaginationOutcome {
    /// 分页被跳过时的占位结果
    pub fn skipped() -> Self {
        Self {
            pages: 0,
            stable: false,
            samples: 0,
            elapsed_ms: 0,
        }
    }
}

/// 单次转换的统计信息
///
/// 打印到 stdout，不做持久化
#[derive(Debug, Clone, Serialize)]
pub struct RenderStats {
    pub status: &'static str,
    pub input: String,
    pub output: String,
    /// 分页稳定后的页数（分页未生效时为 0）
    pub pages: u32,
    /// 页数是否在超时前稳定
    pub stable: bool,
    /// 文档是否使用了 CSS 页码计数器
    pub counter_usage: bool,
    /// 溢出页面边界的元素个数
    pub overflow_count: u32,
    /// 写出的字节数
    pub bytes: u64,
    pub duration_ms: u64,
    pub finished_at: String,
}
