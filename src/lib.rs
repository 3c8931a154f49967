//! Vocast - 文本转语音代理服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Rate Limit Context: 滑动窗口限流
//! - Artifact Context: 音频产物标识与描述
//! - Voice Context: 语言与音色目录
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Clock, RateLimiter, ArtifactStore, TtsEngine）
//! - Commands: 文本转语音编排
//! - Queries: 音频下载、语言与音色查询
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: 内存限流器
//! - Adapters: TTS Client, 文件产物存储
//! - Clock: 系统时钟与测试时钟

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
