//! Rate Limit Context - Policy

use std::time::Duration;

use super::RateLimitError;

/// 限流策略
///
/// 进程级配置，启动后不可变。
/// - `window`: 滑动窗口长度
/// - `max_requests`: 每窗口持续上限
/// - `max_burst`: 可选的突发上限，配置后作为窗口内的硬上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    window: Duration,
    window_delta: chrono::Duration,
    max_requests: u32,
    max_burst: Option<u32>,
}

impl RateLimitPolicy {
    pub fn new(
        window: Duration,
        max_requests: u32,
        max_burst: Option<u32>,
    ) -> Result<Self, RateLimitError> {
        if window.is_zero() {
            return Err(RateLimitError::ZeroWindow);
        }
        if max_requests == 0 {
            return Err(RateLimitError::ZeroMaxRequests);
        }
        if let Some(burst) = max_burst {
            if burst < max_requests {
                return Err(RateLimitError::BurstBelowSustained {
                    burst,
                    max_requests,
                });
            }
        }
        let window_delta = chrono::Duration::from_std(window)
            .map_err(|_| RateLimitError::WindowOutOfRange(window.as_secs()))?;

        Ok(Self {
            window,
            window_delta,
            max_requests,
            max_burst,
        })
    }

    /// 每分钟 N 次，无突发
    pub fn per_minute(max_requests: u32) -> Result<Self, RateLimitError> {
        Self::new(Duration::from_secs(60), max_requests, None)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub(crate) fn window_delta(&self) -> chrono::Duration {
        self.window_delta
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn max_burst(&self) -> Option<u32> {
        self.max_burst
    }

    /// 窗口内允许的最大请求数
    pub fn capacity(&self) -> u32 {
        self.max_burst.unwrap_or(self.max_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_defaults_to_max_requests() {
        let policy = RateLimitPolicy::per_minute(3).unwrap();
        assert_eq!(policy.capacity(), 3);
        assert_eq!(policy.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_capacity_uses_burst_when_set() {
        let policy = RateLimitPolicy::new(Duration::from_secs(60), 60, Some(100)).unwrap();
        assert_eq!(policy.capacity(), 100);
        assert_eq!(policy.max_requests(), 60);
    }

    #[test]
    fn test_rejects_invalid_policies() {
        assert_eq!(
            RateLimitPolicy::new(Duration::ZERO, 1, None),
            Err(RateLimitError::ZeroWindow)
        );
        assert_eq!(
            RateLimitPolicy::new(Duration::from_secs(1), 0, None),
            Err(RateLimitError::ZeroMaxRequests)
        );
        assert_eq!(
            RateLimitPolicy::new(Duration::from_secs(1), 10, Some(5)),
            Err(RateLimitError::BurstBelowSustained {
                burst: 5,
                max_requests: 10
            })
        );
    }
}
