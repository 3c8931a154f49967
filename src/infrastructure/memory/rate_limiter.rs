//! In-Memory Rate Limiter Implementation
//!
//! 每个客户端一个滑动窗口，窗口之间互不阻塞:
//! DashMap 只用于定位窗口，真正的读-清理-追加在每个客户端自己的 Mutex 内完成

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::application::ports::{Clock, RateLimiterPort};
use crate::domain::rate_limit::{ClientWindow, Decision, RateLimitPolicy};

type SharedWindow = Arc<Mutex<ClientWindow>>;

/// 内存限流器
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    enabled: bool,
    windows: DashMap<String, SharedWindow>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            enabled: true,
            windows: DashMap::new(),
        }
    }

    /// 关闭限流的实例，所有请求都会放行
    pub fn disabled(policy: RateLimitPolicy) -> Self {
        Self {
            enabled: false,
            ..Self::new(policy)
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 获取（或创建）客户端窗口，返回前释放 DashMap 分片锁
    fn window_for(&self, client_key: &str) -> SharedWindow {
        if let Some(window) = self.windows.get(client_key) {
            return Arc::clone(window.value());
        }
        let window = self.windows.entry(client_key.to_string()).or_default();
        Arc::clone(window.value())
    }

    /// 启动周期性 GC 任务
    pub fn spawn_gc(self: Arc<Self>, clock: Arc<dyn Clock>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.purge_idle(clock.now());
                if removed > 0 {
                    tracing::debug!(
                        removed = removed,
                        tracked = self.tracked_clients(),
                        "Rate limiter idle windows purged"
                    );
                }
            }
        })
    }
}

impl RateLimiterPort for InMemoryRateLimiter {
    fn admit(&self, client_key: &str, now: DateTime<Utc>) -> Decision {
        if !self.enabled {
            return Decision::fresh(&self.policy);
        }

        let window = self.window_for(client_key);
        let mut window = window.lock().unwrap_or_else(|e| e.into_inner());
        window.try_admit(now, &self.policy)
    }

    fn snapshot(&self, client_key: &str, now: DateTime<Utc>) -> Decision {
        if !self.enabled {
            return Decision::fresh(&self.policy);
        }

        let Some(window) = self.windows.get(client_key).map(|w| Arc::clone(w.value())) else {
            return Decision::fresh(&self.policy);
        };
        let window = window.lock().unwrap_or_else(|e| e.into_inner());
        window.peek(now, &self.policy)
    }

    fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            // 有其他请求持有该窗口时保留，避免其计数落在被移除的窗口上
            if Arc::strong_count(window) > 1 {
                return true;
            }
            match window.try_lock() {
                Ok(mut guard) => {
                    guard.purge(now, &self.policy);
                    !guard.is_empty()
                }
                Err(_) => true,
            }
        });
        before.saturating_sub(self.windows.len())
    }

    fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}
