//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ConvertConfig;
use crate::domain::rate_limit::{RateLimitError, RateLimitPolicy};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 限流配置
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 转换配置
    #[serde(default)]
    pub convert: ConvertSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 组装 ConvertHandler 配置
    pub fn convert_config(&self) -> ConvertConfig {
        ConvertConfig {
            max_text_length: self.convert.max_text_length,
            synthesis_timeout: Duration::from_secs(self.tts.timeout_secs),
            retention: self.storage.retention(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 允许的跨域来源，`*` 表示任意来源
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// 是否使用 X-Forwarded-For 作为客户端标识
    ///
    /// 该头由客户端控制，仅在可信反向代理之后开启
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            trust_forwarded_for: false,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngineKind {
    /// 远程 HTTP 合成服务
    #[default]
    Http,
    /// 固定返回音频，离线开发用
    Fake,
}

impl std::fmt::Display for TtsEngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsEngineKind::Http => write!(f, "http"),
            TtsEngineKind::Fake => write!(f, "fake"),
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub engine: TtsEngineKind,

    /// 合成服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// API Key（http 引擎必填）
    #[serde(default)]
    pub api_key: Option<String>,

    /// 合成截止时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// fake 引擎返回的音频文件，为空时使用内置静音帧
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,
}

fn default_tts_url() -> String {
    "https://texttospeech.googleapis.com/v1".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngineKind::default(),
            url: default_tts_url(),
            api_key: None,
            timeout_secs: default_tts_timeout(),
            fake_audio_path: None,
        }
    }
}

/// 限流配置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// 是否启用限流
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// 窗口长度（秒）
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// 每窗口最大请求数
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// 可选突发上限，配置后作为窗口内硬上限
    #[serde(default)]
    pub max_burst: Option<u32>,

    /// 空闲窗口回收间隔（秒）
    #[serde(default = "default_gc_interval")]
    pub gc_interval_secs: u64,
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    60
}

fn default_gc_interval() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            max_burst: None,
            gc_interval_secs: default_gc_interval(),
        }
    }
}

impl RateLimitConfig {
    /// 构建限流策略
    pub fn policy(&self) -> Result<RateLimitPolicy, RateLimitError> {
        RateLimitPolicy::new(
            Duration::from_secs(self.window_secs),
            self.max_requests,
            self.max_burst,
        )
    }

    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.gc_interval_secs)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 产物保留时间（秒）
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_retention_secs() -> u64 {
    86400 // 24 小时
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            retention_secs: default_retention_secs(),
        }
    }
}

impl StorageConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

/// 转换配置
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertSettings {
    /// 文本最大字符数
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

fn default_max_text_length() -> usize {
    5000
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert!(!config.server.trust_forwarded_for);
        assert_eq!(config.tts.engine, TtsEngineKind::Http);
        assert_eq!(config.rate_limit.max_requests, 60);
        assert_eq!(config.rate_limit.max_burst, None);
        assert_eq!(config.storage.output_dir, PathBuf::from("output"));
        assert_eq!(config.convert.max_text_length, 5000);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_convert_config() {
        let config = AppConfig::default().convert_config();
        assert_eq!(config.max_text_length, 5000);
        assert_eq!(config.synthesis_timeout, Duration::from_secs(30));
        assert_eq!(config.retention, Duration::from_secs(86400));
    }

    #[test]
    fn test_rate_limit_policy() {
        let mut config = RateLimitConfig::default();
        let policy = config.policy().unwrap();
        assert_eq!(policy.capacity(), 60);

        config.max_burst = Some(100);
        assert_eq!(config.policy().unwrap().capacity(), 100);

        config.max_burst = Some(10);
        assert!(config.policy().is_err());
    }
}
