//! Artifact Store Port - 出站端口
//!
//! 定义生成音频的持久化、读取与过期清理

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::domain::artifact::{Artifact, ArtifactId};

/// 产物存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 输出目录不可写
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Artifact Store Port
///
/// 文件系统即索引：不存在额外的元数据表
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 输出目录
    fn output_dir(&self) -> &Path;

    /// 持久化音频数据，分配唯一 ID，绝不覆盖已有文件
    async fn save(&self, data: &[u8]) -> Result<Artifact, StorageError>;

    /// 查找产物（不读取内容）
    async fn locate(&self, id: &ArtifactId) -> Result<Artifact, StorageError>;

    /// 读取产物内容
    async fn read(&self, id: &ArtifactId) -> Result<Vec<u8>, StorageError>;

    /// 删除超过保留期的文件，返回删除数量
    ///
    /// 单个文件删除失败只记录警告，不会中断扫描
    async fn cleanup_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize;
}
