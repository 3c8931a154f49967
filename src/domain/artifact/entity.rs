//! Artifact Context - Entity

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

use super::ArtifactId;

/// 已持久化的音频产物
///
/// 不变量: 文件在 `[created_at, created_at + retention)` 区间内存在，
/// 之后由清理扫描删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl Artifact {
    /// 是否已超过保留期
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        is_expired(self.created_at, now, retention)
    }
}

/// 年龄 `>= retention` 即过期，创建时间在未来时视为未过期
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, retention: Duration) -> bool {
    matches!((now - created_at).to_std(), Ok(age) if age >= retention)
}
