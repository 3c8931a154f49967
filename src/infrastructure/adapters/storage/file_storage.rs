//! File Storage - 文件系统产物存储实现
//!
//! 实现 ArtifactStorePort trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ArtifactStorePort, Clock, StorageError};
use crate::domain::artifact::{self, Artifact, ArtifactId, ARTIFACT_EXTENSION};

/// ID 冲突时的最大重试次数
const MAX_CREATE_ATTEMPTS: usize = 3;

/// 文件系统产物存储
///
/// 每个产物一个文件 `{output_dir}/{id}.mp3`
pub struct FileArtifactStore {
    /// 输出目录
    output_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileArtifactStore {
    /// 创建新的文件存储
    pub async fn new(
        output_dir: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let output_dir = output_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(Self { output_dir, clock })
    }

    /// 获取产物文件路径
    pub fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        self.output_dir.join(id.file_name())
    }

    /// 以 create_new 方式写入，ID 冲突时重新生成
    async fn create_unique(&self, now: DateTime<Utc>) -> Result<(ArtifactId, PathBuf, fs::File), StorageError> {
        let mut last_error = None;
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let id = ArtifactId::generate(now);
            let path = self.artifact_path(&id);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((id, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::warn!(artifact_id = %id, "Artifact id collision, regenerating");
                    last_error = Some(e);
                }
                Err(e) => return Err(StorageError::Unavailable(e.to_string())),
            }
        }
        Err(StorageError::Unavailable(
            last_error.map_or_else(|| "id collision".to_string(), |e| e.to_string()),
        ))
    }
}

fn is_expired(now: DateTime<Utc>, modified: SystemTime, retention: Duration) -> bool {
    artifact::is_expired(modified.into(), now, retention)
}

/// 逐个删除过期文件，返回成功删除的数量
///
/// 单个文件失败只记录警告，继续处理剩余文件
async fn remove_expired(paths: &[PathBuf]) -> usize {
    let mut deleted = 0usize;
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => {
                deleted += 1;
                tracing::debug!(path = %path.display(), "Deleted expired artifact");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Expired artifact already removed");
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to delete expired artifact"
                );
            }
        }
    }
    deleted
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn save(&self, data: &[u8]) -> Result<Artifact, StorageError> {
        let created_at = self.clock.now();
        let (id, path, mut file) = self.create_unique(created_at).await?;

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // 不留下半截文件
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::Unavailable(e.to_string()));
        }

        tracing::debug!(
            artifact_id = %id,
            size = data.len(),
            "Saved artifact"
        );

        Ok(Artifact {
            id,
            path,
            created_at,
            size_bytes: data.len() as u64,
        })
    }

    async fn locate(&self, id: &ArtifactId) -> Result<Artifact, StorageError> {
        let path = self.artifact_path(id);

        let metadata = fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(id.to_string()),
            _ => StorageError::IoError(e.to_string()),
        })?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let created_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Artifact {
            id: id.clone(),
            path,
            created_at,
            size_bytes: metadata.len(),
        })
    }

    async fn read(&self, id: &ArtifactId) -> Result<Vec<u8>, StorageError> {
        let path = self.artifact_path(id);

        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(id.to_string()),
            _ => StorageError::IoError(e.to_string()),
        })
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let mut entries = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.output_dir.display(),
                    error = %e,
                    "Failed to enumerate output directory"
                );
                return 0;
            }
        };

        let mut expired = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Output directory enumeration interrupted");
                    break;
                }
            };

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != ARTIFACT_EXTENSION) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // 并发删除
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to stat artifact");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Artifact mtime unavailable");
                    continue;
                }
            };
            if is_expired(now, modified, retention) {
                expired.push(path);
            }
        }

        let deleted = remove_expired(&expired).await;

        if deleted > 0 {
            tracing::info!(
                deleted = deleted,
                retention_secs = retention.as_secs(),
                "Expired artifacts cleaned up"
            );
        }

        deleted
    }
}
