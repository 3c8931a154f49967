//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ConvertConfig, ConvertHandler,
    // Query handlers
    GetAudioHandler, ListLanguagesHandler, ListVoicesHandler,
    // Ports
    ArtifactStorePort, Clock, RateLimiterPort, TtsEnginePort,
};
use crate::domain::voice::VoiceCatalog;

/// 应用状态
///
/// 限流器作为显式实例由 `Arc` 共享，不使用全局状态
pub struct AppState {
    // ========== Ports ==========
    pub rate_limiter: Arc<dyn RateLimiterPort>,
    pub clock: Arc<dyn Clock>,

    /// 是否信任 X-Forwarded-For，默认关闭，仅在可信反向代理之后开启
    pub trust_forwarded_for: bool,

    // ========== Command Handlers ==========
    pub convert_handler: ConvertHandler,

    // ========== Query Handlers ==========
    pub get_audio_handler: GetAudioHandler,
    pub list_languages_handler: ListLanguagesHandler,
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        rate_limiter: Arc<dyn RateLimiterPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        catalog: Arc<VoiceCatalog>,
        clock: Arc<dyn Clock>,
        convert_config: ConvertConfig,
    ) -> Self {
        let retention = convert_config.retention;
        Self {
            // Ports
            rate_limiter: rate_limiter.clone(),
            clock: clock.clone(),
            trust_forwarded_for: false,

            // Command handlers
            convert_handler: ConvertHandler::new(
                rate_limiter,
                tts_engine,
                artifact_store.clone(),
                catalog.clone(),
                clock.clone(),
                convert_config,
            ),

            // Query handlers
            get_audio_handler: GetAudioHandler::new(artifact_store, clock, retention),
            list_languages_handler: ListLanguagesHandler::new(catalog.clone()),
            list_voices_handler: ListVoicesHandler::new(catalog),
        }
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}
