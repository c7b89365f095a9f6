use std::path::Path;

/// 佇列項目的媒體種類，依宣告的 MIME 前綴決定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
    /// 不支援的類型，保留原始 MIME 以便記錄原因
    Unsupported(String),
}

impl MediaKind {
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Self {
        let normalized = mime_type.trim().to_ascii_lowercase();
        match normalized.split_once('/').map(|(top, _)| top) {
            Some("video") => Self::Video,
            Some("image") => Self::Image,
            _ => Self::Unsupported(mime_type.to_string()),
        }
    }
}

/// 依副檔名推斷 MIME，無法判斷時回傳 `application/octet-stream`
#[must_use]
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// 帶前導點的副檔名（例如 `.mp4`），沒有副檔名時為空字串
#[must_use]
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
