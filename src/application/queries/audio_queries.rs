//! Audio Queries - 音频产物查询

/// 获取已生成音频的查询
#[derive(Debug, Clone)]
pub struct GetAudioQuery {
    /// 外部传入的产物 ID（未校验）
    pub artifact_id: String,
}
