//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{ListLanguages, ListVoices};
use crate::domain::voice::{VoiceCatalog, VoiceInfo};

// ============================================================================
// Response DTOs
// ============================================================================

/// 语言信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageResponse {
    pub code: String,
    pub name: String,
}

/// 某语言下的音色列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVoicesResponse {
    pub language_code: String,
    pub voices: Vec<VoiceInfo>,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListLanguages Handler
pub struct ListLanguagesHandler {
    catalog: Arc<VoiceCatalog>,
}

impl ListLanguagesHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListLanguages) -> Vec<LanguageResponse> {
        self.catalog
            .languages()
            .iter()
            .map(|l| LanguageResponse {
                code: l.code.clone(),
                name: l.name.clone(),
            })
            .collect()
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<VoiceCatalog>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: ListVoices) -> Result<Vec<LanguageVoicesResponse>, ApplicationError> {
        let entries = self.catalog.voices(query.language_code.as_deref())?;
        Ok(entries
            .into_iter()
            .map(|l| LanguageVoicesResponse {
                language_code: l.code.clone(),
                voices: l.voices.clone(),
            })
            .collect())
    }
}
