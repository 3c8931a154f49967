//! Rate Limit Context - 限流限界上下文
//!
//! 职责:
//! - 限流策略（窗口长度、持续上限、突发上限）
//! - 单个客户端的滑动窗口
//! - 准入判定结果

mod errors;
mod policy;
mod window;

pub use errors::RateLimitError;
pub use policy::RateLimitPolicy;
pub use window::{ClientWindow, Decision};
