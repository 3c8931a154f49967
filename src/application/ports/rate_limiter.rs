//! Rate Limiter Port - 准入控制抽象
//!
//! 具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};

use crate::domain::rate_limit::{Decision, RateLimitPolicy};

/// Rate Limiter Port
///
/// 所有方法同步返回，不会无限期阻塞
pub trait RateLimiterPort: Send + Sync {
    /// 判定并记录一次请求
    fn admit(&self, client_key: &str, now: DateTime<Utc>) -> Decision;

    /// 当前窗口快照（不修改状态），用于响应头
    fn snapshot(&self, client_key: &str, now: DateTime<Utc>) -> Decision;

    /// 剩余配额
    fn remaining(&self, client_key: &str, now: DateTime<Utc>) -> u32 {
        self.snapshot(client_key, now).remaining
    }

    /// 回收空窗口，返回回收数量
    fn purge_idle(&self, now: DateTime<Utc>) -> usize;

    /// 当前跟踪的客户端数量
    fn tracked_clients(&self) -> usize;

    fn policy(&self) -> &RateLimitPolicy;
}
