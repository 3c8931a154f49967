//! Memory Layer - In-Memory State Management
//!
//! 实现 RateLimiter，管理每个客户端的滑动窗口内存状态

mod rate_limiter;

pub use rate_limiter::InMemoryRateLimiter;
