//! Artifact Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("无效的产物 ID: {0}")]
    InvalidId(String),
}
