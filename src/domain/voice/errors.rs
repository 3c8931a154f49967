//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VoiceError {
    #[error("Language '{language}' is not supported. Supported languages: {supported:?}")]
    UnsupportedLanguage {
        language: String,
        supported: Vec<String>,
    },

    #[error("Voice '{voice}' is not valid for language '{language}'")]
    InvalidVoice { voice: String, language: String },

    #[error("Speaking rate must be between 0.25 and 4.0, got {0}")]
    InvalidSpeakingRate(f32),

    #[error("Pitch must be between -20.0 and 20.0, got {0}")]
    InvalidPitch(f32),
}
