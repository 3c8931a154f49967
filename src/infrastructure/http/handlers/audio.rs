//! Audio Handlers - 下载已生成的音频

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio::fs;
use tokio_util::io::ReaderStream;

use crate::application::GetAudioQuery;
use crate::domain::artifact::ARTIFACT_MIME_TYPE;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(artifact_id): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state
        .get_audio_handler
        .handle(GetAudioQuery { artifact_id })
        .await?;

    // locate 与打开之间文件可能已被清理
    let file = fs::File::open(&artifact.path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ApiError::NotFound(format!("Artifact not found: {}", artifact.id))
        }
        _ => ApiError::ServiceUnavailable(e.to_string()),
    })?;

    // 流式返回文件内容
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ARTIFACT_MIME_TYPE)
        .header(header::CONTENT_LENGTH, artifact.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.id.file_name()),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
