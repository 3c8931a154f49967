//! Voice Queries - 语言与音色查询

/// 列出所有支持的语言
#[derive(Debug, Clone)]
pub struct ListLanguages;

/// 列出音色，可按语言过滤
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    pub language_code: Option<String>,
}
