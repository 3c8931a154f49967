//! Fake TTS Client - 用于本地开发和测试的 TTS 客户端
//!
//! 始终返回固定的音频数据，不实际调用远程服务

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, TtsEnginePort, TtsError};

/// 未配置音频文件时返回的最小 MP3 帧（MPEG-1 Layer III 帧头 + 静音填充）
const SILENT_MP3_FRAME: [u8; 16] = [
    0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Fake TTS Client 配置
#[derive(Debug, Clone, Default)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频文件路径，为空时返回内置静音帧
    pub audio_file_path: Option<PathBuf>,
    /// 模拟合成延迟（毫秒）
    pub latency_ms: u64,
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的音频数据
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    /// 创建新的 FakeTtsClient
    pub fn new(config: FakeTtsClientConfig) -> Result<Self, std::io::Error> {
        let audio_data = match &config.audio_file_path {
            Some(path) => std::fs::read(path)?,
            None => SILENT_MP3_FRAME.to_vec(),
        };
        tracing::info!(
            path = ?config.audio_file_path,
            latency_ms = config.latency_ms,
            audio_size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self { config, audio_data })
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self {
            config: FakeTtsClientConfig::default(),
            audio_data: SILENT_MP3_FRAME.to_vec(),
        }
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice.voice_name,
            "FakeTtsClient: returning fixed audio"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        Ok(self.audio_data.clone())
    }
}
