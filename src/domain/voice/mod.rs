//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 支持的语言与音色目录
//! - 语速 / 音高参数校验
//! - 将请求中的音色选项解析为具体音色

mod catalog;
mod errors;
mod value_objects;

pub use catalog::{LanguageEntry, VoiceCatalog};
pub use errors::VoiceError;
pub use value_objects::{
    Pitch, ResolvedVoice, SpeakingRate, VoiceGender, VoiceInfo, VoiceOptions,
    DEFAULT_LANGUAGE_CODE,
};
