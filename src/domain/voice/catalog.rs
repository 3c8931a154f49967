//! Voice Context - Catalog
//!
//! 内置的语言与音色目录

use serde::Serialize;

use super::{
    Pitch, ResolvedVoice, SpeakingRate, VoiceError, VoiceGender, VoiceInfo, VoiceOptions,
};

/// 单个语言及其音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
    /// 第一个音色为该语言的默认音色
    pub voices: Vec<VoiceInfo>,
}

/// 语言与音色目录
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    languages: Vec<LanguageEntry>,
}

impl VoiceCatalog {
    pub fn new(languages: Vec<LanguageEntry>) -> Self {
        Self { languages }
    }

    /// 内置目录：英式英语与普通话
    pub fn builtin() -> Self {
        use VoiceGender::{Female, Male};

        Self::new(vec![
            LanguageEntry {
                code: "en-GB".to_string(),
                name: "English (Great Britain)".to_string(),
                voices: vec![
                    VoiceInfo::new("en-GB-Journey-D", Female, true),
                    VoiceInfo::new("en-GB-Neural2-A", Female, true),
                    VoiceInfo::new("en-GB-Neural2-B", Male, true),
                    VoiceInfo::new("en-GB-Neural2-C", Female, true),
                    VoiceInfo::new("en-GB-Neural2-D", Male, true),
                    VoiceInfo::new("en-GB-Neural2-F", Female, true),
                ],
            },
            LanguageEntry {
                code: "zh-CN".to_string(),
                name: "Chinese (Mandarin)".to_string(),
                voices: vec![
                    VoiceInfo::new("cmn-CN-Standard-A", Female, false),
                    VoiceInfo::new("cmn-CN-Standard-B", Male, false),
                    VoiceInfo::new("cmn-CN-Standard-C", Male, false),
                    VoiceInfo::new("cmn-CN-Standard-D", Female, false),
                ],
            },
        ])
    }

    /// 所有支持的语言
    pub fn languages(&self) -> &[LanguageEntry] {
        &self.languages
    }

    /// 按语言过滤音色，未指定语言时返回全部
    pub fn voices(&self, language_code: Option<&str>) -> Result<Vec<&LanguageEntry>, VoiceError> {
        match language_code {
            Some(code) => Ok(vec![self.language(code)?]),
            None => Ok(self.languages.iter().collect()),
        }
    }

    /// 将请求选项解析为具体音色
    ///
    /// 未指定音色时使用该语言的第一个音色
    pub fn resolve(&self, options: &VoiceOptions) -> Result<ResolvedVoice, VoiceError> {
        let language = self.language(&options.language_code)?;

        let voice_name = match options.voice_name.as_deref() {
            Some(name) => language
                .voices
                .iter()
                .find(|v| v.name == name)
                .map(|v| v.name.clone())
                .ok_or_else(|| VoiceError::InvalidVoice {
                    voice: name.to_string(),
                    language: language.code.clone(),
                })?,
            None => language
                .voices
                .first()
                .map(|v| v.name.clone())
                .ok_or_else(|| VoiceError::InvalidVoice {
                    voice: String::new(),
                    language: language.code.clone(),
                })?,
        };

        let speaking_rate = options
            .speaking_rate
            .map(SpeakingRate::new)
            .transpose()?
            .unwrap_or_default();
        let pitch = options.pitch.map(Pitch::new).transpose()?.unwrap_or_default();

        Ok(ResolvedVoice {
            language_code: language.code.clone(),
            voice_name,
            speaking_rate,
            pitch,
        })
    }

    fn language(&self, code: &str) -> Result<&LanguageEntry, VoiceError> {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .ok_or_else(|| VoiceError::UnsupportedLanguage {
                language: code.to_string(),
                supported: self.languages.iter().map(|l| l.code.clone()).collect(),
            })
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
