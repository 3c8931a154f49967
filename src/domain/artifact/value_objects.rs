//! Artifact Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ArtifactError;

/// 产物文件扩展名
pub const ARTIFACT_EXTENSION: &str = "mp3";

/// 产物 Content-Type
pub const ARTIFACT_MIME_TYPE: &str = "audio/mpeg";

const MAX_ID_LEN: usize = 64;

/// 产物唯一标识
///
/// 格式: `{生成时间}-{随机 token}`，例如 `20240101T000000123-9f3c...`，
/// 同时作为文件名主干
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// 基于生成时间和随机数生成新 ID
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}",
            now.format("%Y%m%dT%H%M%S%3f"),
            Uuid::new_v4().simple()
        ))
    }

    /// 解析外部传入的 ID
    ///
    /// 只允许字母、数字和 `-`，保证不会跳出输出目录
    pub fn parse(raw: impl Into<String>) -> Result<Self, ArtifactError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ArtifactError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 对应的文件名
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, ARTIFACT_EXTENSION)
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_is_unique_and_parseable() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let a = ArtifactId::generate(now);
        let b = ArtifactId::generate(now);

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("20240101T123000000-"));
        assert_eq!(ArtifactId::parse(a.as_str()).unwrap(), a);
        assert_eq!(a.file_name(), format!("{}.mp3", a));
    }

    #[test]
    fn test_parse_rejects_path_traversal() {
        assert!(ArtifactId::parse("../etc/passwd").is_err());
        assert!(ArtifactId::parse("abc/def").is_err());
        assert!(ArtifactId::parse("abc.mp3").is_err());
        assert!(ArtifactId::parse("").is_err());
        assert!(ArtifactId::parse("a".repeat(65)).is_err());
    }
}
