//! Storage Adapter - 音频产物文件存储

mod file_storage;

pub use file_storage::FileArtifactStore;
