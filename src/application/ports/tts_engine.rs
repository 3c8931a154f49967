//! TTS Engine Port - 语音合成抽象
//!
//! 定义远程合成能力的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::ResolvedVoice;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 已校验的音色参数
    pub voice: ResolvedVoice,
}

/// TTS Engine Port
///
/// `Synthesize(text, voiceOptions) -> audioBytes | error`
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成，返回 MP3 音频字节
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError>;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
