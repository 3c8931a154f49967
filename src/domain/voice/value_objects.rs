//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 默认语言
pub const DEFAULT_LANGUAGE_CODE: &str = "en-GB";

/// 音色性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Female,
    Male,
}

/// 目录中的单个音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub gender: VoiceGender,
    /// 是否为自然音色（Neural2 / Journey）
    pub natural: bool,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, gender: VoiceGender, natural: bool) -> Self {
        Self {
            name: name.into(),
            gender,
            natural,
        }
    }
}

/// 语速，取值范围 0.25 ~ 4.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeakingRate(f32);

impl SpeakingRate {
    pub const MIN: f32 = 0.25;
    pub const MAX: f32 = 4.0;

    pub fn new(value: f32) -> Result<Self, VoiceError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(VoiceError::InvalidSpeakingRate(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for SpeakingRate {
    fn default() -> Self {
        Self(1.0)
    }
}

/// 音高，取值范围 -20.0 ~ 20.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pitch(f32);

impl Pitch {
    pub const MIN: f32 = -20.0;
    pub const MAX: f32 = 20.0;

    pub fn new(value: f32) -> Result<Self, VoiceError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(VoiceError::InvalidPitch(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Pitch {
    fn default() -> Self {
        Self(0.0)
    }
}

/// 请求携带的音色选项（未校验）
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    pub language_code: String,
    pub voice_name: Option<String>,
    pub speaking_rate: Option<f32>,
    pub pitch: Option<f32>,
}

impl VoiceOptions {
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            voice_name: None,
            speaking_rate: None,
            pitch: None,
        }
    }

    pub fn with_voice(mut self, voice_name: impl Into<String>) -> Self {
        self.voice_name = Some(voice_name.into());
        self
    }
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE_CODE)
    }
}

/// 经过目录校验后的音色
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVoice {
    pub language_code: String,
    pub voice_name: String,
    pub speaking_rate: SpeakingRate,
    pub pitch: Pitch,
}
