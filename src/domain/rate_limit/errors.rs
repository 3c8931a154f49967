//! Rate Limit Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("限流窗口必须大于 0")]
    ZeroWindow,

    #[error("限流窗口过大: {0}s")]
    WindowOutOfRange(u64),

    #[error("每窗口最大请求数必须大于 0")]
    ZeroMaxRequests,

    #[error("突发上限 {burst} 不能小于持续上限 {max_requests}")]
    BurstBelowSustained { burst: u32, max_requests: u32 },
}
