//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::voice::{VoiceInfo, VoiceOptions, DEFAULT_LANGUAGE_CODE};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Health DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

// ============================================================================
// Convert DTOs
// ============================================================================

fn default_language_code() -> String {
    DEFAULT_LANGUAGE_CODE.to_string()
}

/// 文本转语音请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub text: String,
    #[serde(default = "default_language_code", alias = "language")]
    pub language_code: String,
    #[serde(default)]
    pub voice_name: Option<String>,
    #[serde(default)]
    pub speaking_rate: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
}

impl ConvertRequest {
    pub fn voice_options(&self) -> VoiceOptions {
        VoiceOptions {
            language_code: self.language_code.clone(),
            voice_name: self.voice_name.clone(),
            speaking_rate: self.speaking_rate,
            pitch: self.pitch,
        }
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LanguageDto {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageVoicesDto {
    pub language_code: String,
    pub voices: Vec<VoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<LanguageVoicesDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoicesParams {
    #[serde(default, alias = "languageCode")]
    pub language: Option<String>,
}
