//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use std::time::Duration;
use thiserror::Error;

use crate::application::ports::{StorageError, TtsError};
use crate::domain::artifact::ArtifactError;
use crate::domain::voice::VoiceError;

/// 应用层错误
///
/// 均为单次请求的结果，不会导致进程退出
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误（空文本、超长文本、无效音色），不消耗配额
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 超出限流配额
    #[error("Too many requests. Please try again in {}s", .retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },

    /// 上游合成失败或超时，配额仍然被消耗
    #[error("Failed to convert text to speech: {0}")]
    SynthesisFailed(#[source] TtsError),

    /// 输出目录不可写，合成结果被丢弃
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ArtifactError> for ApplicationError {
    fn from(err: ArtifactError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::SynthesisFailed(err)
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => Self::not_found("Artifact", id),
            StorageError::Unavailable(msg) | StorageError::IoError(msg) => {
                Self::StorageUnavailable(msg)
            }
        }
    }
}
