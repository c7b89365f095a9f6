use serde::{Deserialize, Serialize};

/// 正規化後的媒體資訊，圖片沒有 `duration_seconds`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_seconds: Option<f64>,
    pub byte_size: u64,
    pub mime_type: String,
    pub extension: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: String,
}

impl MediaMetadata {
    /// 等比例縮放到 `target_width` 時的高度，至少為 1
    #[must_use]
    pub fn scaled_height(&self, target_width: u32) -> u32 {
        if self.width == 0 {
            return 1;
        }
        let height = u64::from(target_width) * u64::from(self.height) / u64::from(self.width);
        u32::try_from(height).unwrap_or(u32::MAX).max(1)
    }
}
