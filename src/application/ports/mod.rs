//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod clock;
mod rate_limiter;
mod tts_engine;

pub use artifact_store::{ArtifactStorePort, StorageError};
pub use clock::Clock;
pub use rate_limiter::RateLimiterPort;
pub use tts_engine::{SynthesisRequest, TtsEnginePort, TtsError};
