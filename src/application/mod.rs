//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Clock、RateLimiter、ArtifactStore、TtsEngine）
//! - commands: CQRS 命令及处理器（文本转语音）
//! - queries: CQRS 查询及处理器（音频、语言、音色）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{handlers::ConvertHandler, ConvertCommand, ConvertConfig, ConvertResponse};

pub use error::ApplicationError;

pub use ports::{
    ArtifactStorePort, Clock, RateLimiterPort, StorageError, SynthesisRequest, TtsEnginePort,
    TtsError,
};

pub use queries::{
    handlers::{
        GetAudioHandler, LanguageResponse, LanguageVoicesResponse, ListLanguagesHandler,
        ListVoicesHandler,
    },
    GetAudioQuery, ListLanguages, ListVoices,
};
