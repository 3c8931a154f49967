//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsEngineKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 未配置 `tts.api_key` 时读取的环境变量
const FALLBACK_API_KEY_ENV: &str = "GOOGLE_CLOUD_API_KEY";

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOCAST_SERVER__PORT=8080`
/// - `VOCAST_SERVER__CORS_ORIGINS=http://a.example,http://b.example`
/// - `VOCAST_TTS__API_KEY=...`
/// - `VOCAST_RATE_LIMIT__MAX_REQUESTS=30`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.cors_origins", vec!["http://localhost:5173"])?
        .set_default("server.trust_forwarded_for", false)?
        .set_default("tts.engine", "http")?
        .set_default("tts.url", "https://texttospeech.googleapis.com/v1")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("rate_limit.enabled", true)?
        .set_default("rate_limit.window_secs", 60)?
        .set_default("rate_limit.max_requests", 60)?
        .set_default("rate_limit.gc_interval_secs", 60)?
        .set_default("storage.output_dir", "output")?
        .set_default("storage.retention_secs", 86400)?
        .set_default("convert.max_text_length", 5000)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: VOCAST_，层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("VOCAST")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    if app_config.tts.api_key.is_none() {
        app_config.tts.api_key = std::env::var(FALLBACK_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty());
    }

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.engine == TtsEngineKind::Http {
        if config.tts.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "TTS URL cannot be empty".to_string(),
            ));
        }
        if config.tts.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::ValidationError(format!(
                "tts.api_key is required for the http engine (set VOCAST_TTS__API_KEY or {})",
                FALLBACK_API_KEY_ENV
            )));
        }
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    config
        .rate_limit
        .policy()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if config.rate_limit.enabled && config.rate_limit.gc_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Rate limit GC interval cannot be 0 when rate limiting is enabled".to_string(),
        ));
    }

    if config.storage.retention_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Storage retention cannot be 0".to_string(),
        ));
    }

    if config.convert.max_text_length == 0 {
        return Err(ConfigError::ValidationError(
            "Max text length cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("CORS Origins: {:?}", config.server.cors_origins);
    tracing::info!("Trust X-Forwarded-For: {}", config.server.trust_forwarded_for);
    tracing::info!("TTS Engine: {}", config.tts.engine);
    if config.tts.engine == TtsEngineKind::Http {
        tracing::info!("TTS URL: {}", config.tts.url);
    }
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Rate Limit Enabled: {}", config.rate_limit.enabled);
    if config.rate_limit.enabled {
        tracing::info!(
            "Rate Limit: {} requests / {}s (burst: {:?})",
            config.rate_limit.max_requests,
            config.rate_limit.window_secs,
            config.rate_limit.max_burst
        );
    }
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Retention: {}s", config.storage.retention_secs);
    tracing::info!("Max Text Length: {}", config.convert.max_text_length);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
