//! Convert Command Handler - 文本转语音编排
//!
//! 固定顺序: 输入校验 → 准入 → 合成 → 清理过期文件 → 持久化

use std::sync::Arc;

use crate::application::commands::convert_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactStorePort, Clock, RateLimiterPort, SynthesisRequest, TtsEnginePort, TtsError,
};
use crate::domain::voice::{ResolvedVoice, VoiceCatalog};

/// Convert Handler - 转换请求的唯一入口
pub struct ConvertHandler {
    rate_limiter: Arc<dyn RateLimiterPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    artifact_store: Arc<dyn ArtifactStorePort>,
    catalog: Arc<VoiceCatalog>,
    clock: Arc<dyn Clock>,
    config: ConvertConfig,
}

impl ConvertHandler {
    pub fn new(
        rate_limiter: Arc<dyn RateLimiterPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        catalog: Arc<VoiceCatalog>,
        clock: Arc<dyn Clock>,
        config: ConvertConfig,
    ) -> Self {
        Self {
            rate_limiter,
            tts_engine,
            artifact_store,
            catalog,
            clock,
            config,
        }
    }

    pub async fn handle(&self, cmd: ConvertCommand) -> Result<ConvertResponse, ApplicationError> {
        // 校验失败不消耗配额
        let voice = self.validate(&cmd)?;

        let decision = self.rate_limiter.admit(&cmd.client_key, self.clock.now());
        if !decision.allowed {
            tracing::warn!(
                client_key = %cmd.client_key,
                retry_after_secs = decision.retry_after.as_secs(),
                "Request rate limited"
            );
            return Err(ApplicationError::RateLimited {
                retry_after: decision.retry_after,
            });
        }

        tracing::debug!(
            client_key = %cmd.client_key,
            text_chars = cmd.text.chars().count(),
            voice = %voice.voice_name,
            remaining = decision.remaining,
            "Request admitted"
        );

        // 已准入的请求即使合成失败也占用一个配额
        let request = SynthesisRequest {
            text: cmd.text,
            voice,
        };
        let audio = match tokio::time::timeout(
            self.config.synthesis_timeout,
            self.tts_engine.synthesize(request),
        )
        .await
        {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => {
                tracing::error!(client_key = %cmd.client_key, error = %e, "Synthesis failed");
                return Err(ApplicationError::SynthesisFailed(e));
            }
            Err(_) => {
                tracing::error!(
                    client_key = %cmd.client_key,
                    timeout_secs = self.config.synthesis_timeout.as_secs_f64(),
                    "Synthesis deadline exceeded"
                );
                return Err(ApplicationError::SynthesisFailed(TtsError::Timeout));
            }
        };

        // 没有定时任务，过期清理依附于请求流量
        self.artifact_store
            .cleanup_expired(self.clock.now(), self.config.retention)
            .await;

        let artifact = self.artifact_store.save(&audio).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist synthesized audio");
            ApplicationError::StorageUnavailable(e.to_string())
        })?;

        tracing::info!(
            client_key = %cmd.client_key,
            artifact_id = %artifact.id,
            size_bytes = artifact.size_bytes,
            "Conversion completed"
        );

        Ok(ConvertResponse {
            audio,
            artifact,
            decision,
        })
    }

    fn validate(&self, cmd: &ConvertCommand) -> Result<ResolvedVoice, ApplicationError> {
        if cmd.text.trim().is_empty() {
            return Err(ApplicationError::validation("Text cannot be empty"));
        }

        let length = cmd.text.chars().count();
        if length > self.config.max_text_length {
            return Err(ApplicationError::validation(format!(
                "Text is too long: {} characters (max {})",
                length, self.config.max_text_length
            )));
        }

        Ok(self.catalog.resolve(&cmd.voice)?)
    }
}
