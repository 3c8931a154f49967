//! HTTP Error Handling
//!
//! 业务错误统一转为 `{errno, error, data: null}` 并使用真实 HTTP 状态码

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    TooManyRequests { message: String, retry_after: Duration },
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

/// 向上取整到秒，至少为 1
pub(crate) fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // errno 与 HTTP 状态码一致
        let errno = i32::from(status.as_u16());
        let mut retry_after = None;

        let message = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno, error = %msg, "Bad request");
                msg
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = errno, error = %msg, "Resource not found");
                msg
            }
            ApiError::TooManyRequests { message, retry_after: after } => {
                tracing::warn!(errno = errno, error = %message, "Rate limited");
                retry_after = Some(retry_after_secs(after));
                message
            }
            ApiError::BadGateway(msg) => {
                tracing::error!(errno = errno, error = %msg, "Upstream synthesis failed");
                msg
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = errno, error = %msg, "Service unavailable");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno, error = %msg, "Internal server error");
                msg
            }
        };

        let mut response = (status, Json(ErrorResponse::new(errno, message))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            err @ ApplicationError::RateLimited { retry_after } => ApiError::TooManyRequests {
                message: err.to_string(),
                retry_after,
            },
            err @ ApplicationError::SynthesisFailed(_) => ApiError::BadGateway(err.to_string()),
            ApplicationError::StorageUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            err @ ApplicationError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}
