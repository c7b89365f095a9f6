use chrono::Utc;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid regex"));

/// 成品上傳的根資料夾
pub const PROCESSED_FOLDER: &str = "processed";

/// 一個待上傳成品的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub label: &'static str,
    pub local_path: PathBuf,
    pub remote_path: String,
    pub mime_type: &'static str,
}

/// 成品命名：`<base>-<timestamp>`，timestamp 為 Unix 毫秒
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishKey {
    pub base_name: String,
    pub timestamp: i64,
}

impl PublishKey {
    #[must_use]
    pub fn new(base_name: String, timestamp: i64) -> Self {
        Self {
            base_name,
            timestamp,
        }
    }

    /// 以佇列檔名的主檔名與目前時間建立
    #[must_use]
    pub fn for_source(source_name: &str) -> Self {
        Self::new(sanitize_base_name(source_name), Utc::now().timestamp_millis())
    }

    #[must_use]
    pub fn stem(&self) -> String {
        format!("{}-{}", self.base_name, self.timestamp)
    }

    /// `processed/<stem>/<stem>.<extension>`
    #[must_use]
    pub fn remote_path(&self, extension: &str) -> String {
        let stem = self.stem();
        format!("{PROCESSED_FOLDER}/{stem}/{stem}.{extension}")
    }
}

/// 取主檔名，非 `[A-Za-z0-9._-]` 的字元換成 `-`
#[must_use]
pub fn sanitize_base_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let cleaned = UNSAFE_CHARS.replace_all(stem, "-");
    let cleaned = cleaned.trim_matches('-');

    if cleaned.is_empty() {
        "media".to_string()
    } else {
        cleaned.to_string()
    }
}

/// 各分支完成後留在工作目錄中的成品
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobArtifacts {
    Video {
        video: PathBuf,
        subtitles: Option<PathBuf>,
        audio: PathBuf,
        collage: PathBuf,
        manifest: PathBuf,
    },
    Image {
        image: PathBuf,
        manifest: PathBuf,
    },
}

/// 依媒體種類產生上傳清單，順序即上傳順序
#[must_use]
pub fn build_upload_targets(artifacts: &JobArtifacts, key: &PublishKey) -> Vec<UploadTarget> {
    let target = |label, local_path: &Path, extension: &str, mime_type| UploadTarget {
        label,
        local_path: local_path.to_path_buf(),
        remote_path: key.remote_path(extension),
        mime_type,
    };

    match artifacts {
        JobArtifacts::Video {
            video,
            subtitles,
            audio,
            collage,
            manifest,
        } => {
            let mut targets = vec![target("video", video, "mp4", "video/mp4")];
            if let Some(subtitles) = subtitles {
                targets.push(target("subtitles", subtitles, "vtt", "text/vtt"));
            }
            targets.push(target("audio", audio, "mp3", "audio/mpeg"));
            targets.push(target("collage", collage, "webp", "image/webp"));
            targets.push(target("manifest", manifest, "json", "application/json"));
            targets
        }
        JobArtifacts::Image { image, manifest } => vec![
            target("image", image, "webp", "image/webp"),
            target("manifest", manifest, "json", "application/json"),
        ],
    }
}
