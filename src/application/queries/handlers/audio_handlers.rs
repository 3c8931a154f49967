//! Audio Query Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStorePort, Clock};
use crate::application::queries::audio_queries::GetAudioQuery;
use crate::domain::artifact::{Artifact, ArtifactId};

/// GetAudio Handler - 定位已生成的音频
///
/// 只返回产物描述，由 HTTP 层流式读取文件。
/// 超过保留期但尚未被清理的文件同样视为不存在
pub struct GetAudioHandler {
    artifact_store: Arc<dyn ArtifactStorePort>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl GetAudioHandler {
    pub fn new(
        artifact_store: Arc<dyn ArtifactStorePort>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        Self {
            artifact_store,
            clock,
            retention,
        }
    }

    pub async fn handle(&self, query: GetAudioQuery) -> Result<Artifact, ApplicationError> {
        let id = ArtifactId::parse(query.artifact_id)?;
        let artifact = self.artifact_store.locate(&id).await?;

        if artifact.is_expired(self.clock.now(), self.retention) {
            tracing::debug!(artifact_id = %id, "Artifact past retention");
            return Err(ApplicationError::not_found("Artifact", id.as_str()));
        }

        Ok(artifact)
    }
}
