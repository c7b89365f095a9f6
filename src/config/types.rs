use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COLLAGE_COLS: u32 = 10;
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 320;
pub const DEFAULT_INTERVAL_SEC: f64 = 10.0;
pub const DEFAULT_WEBP_QUALITY: u8 = 80;
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Supabase,
    Local,
}

/// 執行期設定，啟動時建立一次後不再變動
///
/// 欄位名稱對應大寫的環境變數，例如 `thumbnail_width` ↔ `THUMBNAIL_WIDTH`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage_backend: StorageBackend,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub supabase_bucket: Option<String>,
    #[serde(default = "default_local_storage_root")]
    pub local_storage_root: PathBuf,
    #[serde(default = "default_queue_folder")]
    pub queue_folder: String,

    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    #[serde(default = "default_interval_sec")]
    pub interval_sec: f64,
    #[serde(default = "default_collage_cols")]
    pub collage_cols: u32,
    #[serde(default = "default_webp_quality")]
    pub webp_quality: u8,

    pub openai_api_key: Option<String>,
    #[serde(default = "default_transcription_endpoint")]
    pub transcription_endpoint: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,
    pub max_workers: Option<usize>,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub fail_fast: bool,

    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,
    #[serde(default = "default_ffprobe_bin")]
    pub ffprobe_bin: String,
    #[serde(default = "default_display_locale")]
    pub display_locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::default(),
            supabase_url: None,
            supabase_key: None,
            supabase_bucket: None,
            local_storage_root: default_local_storage_root(),
            queue_folder: default_queue_folder(),
            thumbnail_width: default_thumbnail_width(),
            interval_sec: default_interval_sec(),
            collage_cols: default_collage_cols(),
            webp_quality: default_webp_quality(),
            openai_api_key: None,
            transcription_endpoint: default_transcription_endpoint(),
            transcription_model: default_transcription_model(),
            workspace_dir: default_workspace_dir(),
            max_workers: None,
            command_timeout_secs: default_command_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            fail_fast: false,
            ffmpeg_bin: default_ffmpeg_bin(),
            ffprobe_bin: default_ffprobe_bin(),
            display_locale: default_display_locale(),
        }
    }
}

impl Config {
    /// 轉錄金鑰；空字串視為未設定
    #[must_use]
    pub fn transcription_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// 同時執行的外部程序上限，未設定時使用實體核心數
    #[must_use]
    pub fn worker_limit(&self) -> usize {
        self.max_workers
            .filter(|n| *n > 0)
            .or_else(sysinfo::System::physical_core_count)
            .unwrap_or(4)
    }

    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// 佇列資料夾，去除首尾斜線
    #[must_use]
    pub fn queue_prefix(&self) -> &str {
        self.queue_folder.trim_matches('/')
    }
}

fn default_local_storage_root() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_queue_folder() -> String {
    "queue".to_string()
}

const fn default_thumbnail_width() -> u32 {
    DEFAULT_THUMBNAIL_WIDTH
}

const fn default_interval_sec() -> f64 {
    DEFAULT_INTERVAL_SEC
}

const fn default_collage_cols() -> u32 {
    DEFAULT_COLLAGE_COLS
}

const fn default_webp_quality() -> u8 {
    DEFAULT_WEBP_QUALITY
}

fn default_transcription_endpoint() -> String {
    DEFAULT_TRANSCRIPTION_ENDPOINT.to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from("./temp")
}

const fn default_command_timeout_secs() -> u64 {
    1800
}

const fn default_http_timeout_secs() -> u64 {
    300
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_bin() -> String {
    "ffprobe".to_string()
}

fn default_display_locale() -> String {
    "en-US".to_string()
}
