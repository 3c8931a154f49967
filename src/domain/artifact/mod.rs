//! Artifact Context - 音频产物限界上下文
//!
//! 职责:
//! - 产物 ID 生成与校验
//! - 产物描述（路径、创建时间、大小）
//!
//! 文件系统是唯一的索引，不维护额外的元数据

mod entity;
mod errors;
mod value_objects;

pub use entity::{is_expired, Artifact};
pub use errors::ArtifactError;
pub use value_objects::{ArtifactId, ARTIFACT_EXTENSION, ARTIFACT_MIME_TYPE};
