//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Rate Limit Context: 按客户端的滑动窗口限流
//! - Artifact Context: 生成音频文件的标识与描述
//! - Voice Context: 语言与音色目录

pub mod artifact;
pub mod rate_limit;
pub mod voice;
