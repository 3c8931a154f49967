//! Convert Handler - 文本转语音
//!
//! 每个响应（包括错误响应）都带有限流头

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::application::{ConvertCommand, ConvertResponse};
use crate::domain::artifact::ARTIFACT_MIME_TYPE;
use crate::domain::rate_limit::Decision;
use crate::infrastructure::http::dto::ConvertRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const ARTIFACT_ID_HEADER: &str = "x-artifact-id";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// 无法识别来源时使用的客户端标识
const UNKNOWN_CLIENT: &str = "unknown";

/// 下载文件名
const DOWNLOAD_FILE_NAME: &str = "speech.mp3";

/// 解析客户端标识
///
/// 优先取 X-Forwarded-For 的第一个地址（需开启信任），其次为对端 IP
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(
        RATE_LIMIT_REMAINING_HEADER,
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        RATE_LIMIT_RESET_HEADER,
        HeaderValue::from(ceil_secs(decision.reset_after)),
    );
}

fn audio_response(result: ConvertResponse) -> Response {
    let size = result.audio.len();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ARTIFACT_MIME_TYPE)
        .header(header::CONTENT_LENGTH, size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
        )
        .header(ARTIFACT_ID_HEADER, result.artifact.id.as_str())
        .body(Body::from(result.audio))
        .unwrap_or_else(|e| ApiError::Internal(e.to_string()).into_response())
}

/// POST /api/v1/tts/convert
pub async fn convert(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Response {
    let client_key = client_key(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.trust_forwarded_for,
    );

    let outcome = match payload {
        Ok(Json(req)) => {
            let cmd = ConvertCommand {
                client_key: client_key.clone(),
                voice: req.voice_options(),
                text: req.text,
            };
            state.convert_handler.handle(cmd).await.map_err(ApiError::from)
        }
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    };

    let (mut response, decision) = match outcome {
        Ok(result) => {
            let decision = result.decision;
            (audio_response(result), decision)
        }
        Err(err) => (
            err.into_response(),
            state.rate_limiter.snapshot(&client_key, state.clock.now()),
        ),
    };

    apply_rate_limit_headers(response.headers_mut(), &decision);
    response
}
