//! Rate Limit Context - Sliding Window

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::RateLimitPolicy;

/// 准入判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// 是否放行
    pub allowed: bool,
    /// 窗口容量
    pub limit: u32,
    /// 当前窗口剩余配额
    pub remaining: u32,
    /// 被拒绝时需要等待的时间；放行时为 0
    pub retry_after: Duration,
    /// 最早一次计数请求离开窗口的剩余时间；窗口为空时为 0
    pub reset_after: Duration,
}

impl Decision {
    /// 空窗口对应的判定（不产生副作用）
    pub fn fresh(policy: &RateLimitPolicy) -> Self {
        Self {
            allowed: true,
            limit: policy.capacity(),
            remaining: policy.capacity(),
            retry_after: Duration::ZERO,
            reset_after: Duration::ZERO,
        }
    }
}

/// 单个客户端的滑动窗口
///
/// 不变量: 在 `now` 执行 purge 之后，所有时间戳 `t` 满足
/// `now - window < t`。恰好位于 `now - window` 的时间戳会被清除（半开窗口）。
#[derive(Debug, Clone, Default)]
pub struct ClientWindow {
    timestamps: VecDeque<DateTime<Utc>>,
}

impl ClientWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// 清除窗口外的时间戳
    pub fn purge(&mut self, now: DateTime<Utc>, policy: &RateLimitPolicy) {
        let cutoff = now - policy.window_delta();
        while let Some(oldest) = self.timestamps.front() {
            if *oldest <= cutoff {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// 尝试准入一次请求
    ///
    /// 放行时在窗口尾部追加 `now`
    pub fn try_admit(&mut self, now: DateTime<Utc>, policy: &RateLimitPolicy) -> Decision {
        self.purge(now, policy);

        let capacity = policy.capacity() as usize;
        if self.timestamps.len() < capacity {
            // 时钟回拨时保持序列有序
            let at = self.timestamps.back().map_or(now, |last| (*last).max(now));
            self.timestamps.push_back(at);

            Decision {
                allowed: true,
                limit: policy.capacity(),
                remaining: (capacity - self.timestamps.len()) as u32,
                retry_after: Duration::ZERO,
                reset_after: self.reset_after(now, policy),
            }
        } else {
            let wait = self.reset_after(now, policy);
            Decision {
                allowed: false,
                limit: policy.capacity(),
                remaining: 0,
                retry_after: wait,
                reset_after: wait,
            }
        }
    }

    /// 只读快照：与 try_admit 相同的 purge-then-count 逻辑，但不修改状态
    pub fn peek(&self, now: DateTime<Utc>, policy: &RateLimitPolicy) -> Decision {
        let cutoff = now - policy.window_delta();
        let oldest = self.timestamps.iter().find(|t| **t > cutoff).copied();
        let used = self.timestamps.iter().filter(|t| **t > cutoff).count();
        let capacity = policy.capacity() as usize;
        let remaining = capacity.saturating_sub(used) as u32;
        let reset_after = oldest
            .map(|t| until_exit(t, now, policy))
            .unwrap_or(Duration::ZERO);

        Decision {
            allowed: remaining > 0,
            limit: policy.capacity(),
            remaining,
            retry_after: if remaining > 0 { Duration::ZERO } else { reset_after },
            reset_after,
        }
    }

    fn reset_after(&self, now: DateTime<Utc>, policy: &RateLimitPolicy) -> Duration {
        self.timestamps
            .front()
            .map(|oldest| until_exit(*oldest, now, policy))
            .unwrap_or(Duration::ZERO)
    }
}

/// `t` 离开窗口前的剩余时间
fn until_exit(t: DateTime<Utc>, now: DateTime<Utc>, policy: &RateLimitPolicy) -> Duration {
    (t + policy.window_delta() - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    #[test]
    fn test_three_per_minute_scenario() {
        let policy = RateLimitPolicy::per_minute(3).unwrap();
        let mut window = ClientWindow::new();

        for i in 0..3 {
            let decision = window.try_admit(t0() + secs(i), &policy);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 2 - i as u32);
        }

        let rejected = window.try_admit(t0() + secs(3), &policy);
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.retry_after, Duration::from_secs(57));
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_boundary_instant_is_purged() {
        let policy = RateLimitPolicy::per_minute(1).unwrap();
        let mut window = ClientWindow::new();

        assert!(window.try_admit(t0(), &policy).allowed);
        assert!(!window.try_admit(t0() + secs(59), &policy).allowed);

        // 恰好一个窗口之后，旧时间戳不再计数
        let decision = window.try_admit(t0() + secs(60), &policy);
        assert!(decision.allowed);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_never_exceeds_capacity_in_any_trailing_window() {
        let policy = RateLimitPolicy::new(Duration::from_secs(10), 4, None).unwrap();
        let mut window = ClientWindow::new();
        let mut admitted = Vec::new();

        // 每 700ms 一次请求，持续 60 秒
        for i in 0..86 {
            let now = t0() + chrono::Duration::milliseconds(700 * i);
            if window.try_admit(now, &policy).allowed {
                admitted.push(now);
            }
        }

        for (idx, start) in admitted.iter().enumerate() {
            let in_window = admitted[idx..]
                .iter()
                .filter(|t| **t < *start + secs(10))
                .count();
            assert!(in_window <= 4, "window starting at {start} admitted {in_window}");
        }
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let policy = RateLimitPolicy::per_minute(2).unwrap();
        let mut window = ClientWindow::new();
        window.try_admit(t0(), &policy);

        let snapshot = window.peek(t0() + secs(30), &policy);
        assert_eq!(snapshot.remaining, 1);
        assert_eq!(snapshot.reset_after, Duration::from_secs(30));

        // 窗口外的时间戳在 peek 中不计数，但仍保留在序列中
        let later = window.peek(t0() + secs(61), &policy);
        assert_eq!(later.remaining, 2);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_remaining_never_negative() {
        let policy = RateLimitPolicy::per_minute(2).unwrap();
        let mut window = ClientWindow::new();
        for i in 0..10 {
            let decision = window.try_admit(t0() + secs(i), &policy);
            assert!(decision.remaining <= 2);
            assert!(window.peek(t0() + secs(i), &policy).remaining <= 2);
        }
    }

    #[test]
    fn test_clock_going_backwards_keeps_order() {
        let policy = RateLimitPolicy::per_minute(5).unwrap();
        let mut window = ClientWindow::new();
        window.try_admit(t0() + secs(10), &policy);
        window.try_admit(t0() + secs(5), &policy);

        window.purge(t0() + secs(70), &policy);
        assert!(window.is_empty());
    }

    #[test]
    fn test_fresh_decision() {
        let policy = RateLimitPolicy::new(Duration::from_secs(60), 60, Some(100)).unwrap();
        let decision = Decision::fresh(&policy);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 100);
        assert_eq!(decision.limit, 100);
    }
}
