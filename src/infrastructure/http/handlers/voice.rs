//! Voice Handlers - 语言与音色目录

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{ListLanguages, ListVoices};
use crate::infrastructure::http::dto::{
    ApiResponse, LanguageDto, LanguageVoicesDto, LanguagesResponse, VoicesParams, VoicesResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 支持的语言列表
pub async fn list_languages(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<LanguagesResponse>> {
    let languages = state
        .list_languages_handler
        .handle(ListLanguages)
        .into_iter()
        .map(|l| LanguageDto {
            code: l.code,
            name: l.name,
        })
        .collect();

    Json(ApiResponse::success(LanguagesResponse { languages }))
}

/// 音色列表，可按语言过滤
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VoicesParams>,
) -> Result<Json<ApiResponse<VoicesResponse>>, ApiError> {
    let voices = state
        .list_voices_handler
        .handle(ListVoices {
            language_code: params.language,
        })?
        .into_iter()
        .map(|entry| LanguageVoicesDto {
            language_code: entry.language_code,
            voices: entry.voices,
        })
        .collect();

    Ok(Json(ApiResponse::success(VoicesResponse { voices })))
}
