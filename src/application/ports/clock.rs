//! Clock Port - 时间源抽象
//!
//! 滑动窗口与文件过期都依赖当前时间，通过该端口注入，
//! 生产环境使用系统时钟，测试使用可控时钟

use chrono::{DateTime, Utc};

/// 时间源
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
