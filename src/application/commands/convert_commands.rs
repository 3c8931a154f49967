//! Convert Commands - 文本转语音命令

use std::time::Duration;

use crate::domain::artifact::Artifact;
use crate::domain::rate_limit::Decision;
use crate::domain::voice::VoiceOptions;

/// 文本转语音命令
#[derive(Debug, Clone)]
pub struct ConvertCommand {
    /// 客户端标识（通常为来源 IP）
    pub client_key: String,
    pub text: String,
    pub voice: VoiceOptions,
}

/// 文本转语音响应
#[derive(Debug, Clone)]
pub struct ConvertResponse {
    /// 合成的音频数据
    pub audio: Vec<u8>,
    /// 持久化后的产物
    pub artifact: Artifact,
    /// 本次请求的准入判定
    pub decision: Decision,
}

/// ConvertHandler 配置
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// 文本最大字符数
    pub max_text_length: usize,
    /// 合成调用的截止时间
    pub synthesis_timeout: Duration,
    /// 产物保留期
    pub retention: Duration,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_text_length: 5000,
            synthesis_timeout: Duration::from_secs(30),
            retention: Duration::from_secs(24 * 3600),
        }
    }
}
