//! 管線錯誤型別
//!
//! 每個階段各自對應一種錯誤，協調器只需要依種類記錄或中止。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// 外部程式（ffmpeg / ffprobe）執行失敗的原因
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("無法啟動 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} 執行逾時（{seconds} 秒）")]
    Timeout { program: String, seconds: u64 },

    #[error("{program} 執行失敗 (exit code {code:?}): {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} I/O 錯誤: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("無法列出佇列 {prefix}: {message}")]
    List { prefix: String, message: String },

    #[error("下載失敗 {remote_path}: {message}")]
    Download {
        remote_path: String,
        message: String,
    },

    #[error("影片清理失敗: {0}")]
    Transcode(#[source] CommandError),

    #[error("無法取得媒體資訊 {path}: {message}")]
    Probe { path: PathBuf, message: String },

    #[error("圖片解碼失敗 {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("縮圖擷取失敗 [{index}]: {message}")]
    Thumbnail { index: usize, message: String },

    #[error("拼貼圖產生失敗: {0}")]
    Collage(String),

    #[error("WebP 轉檔失敗 {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("音訊擷取失敗: {0}")]
    AudioExtract(#[source] CommandError),

    #[error("語音轉錄失敗: {0}")]
    Transcription(String),

    #[error("JSON 序列化失敗: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("上傳失敗 {remote_path}: {message}")]
    Upload {
        remote_path: String,
        message: String,
    },

    #[error("刪除佇列項目失敗 {remote_path}: {message}")]
    Delete {
        remote_path: String,
        message: String,
    },

    #[error("工作目錄錯誤 {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("無法建立工作執行緒池: {0}")]
    WorkerPool(String),

    #[error("I/O 錯誤: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    pub fn workspace(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// 錯誤種類的簡短名稱，用於摘要與日誌
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::List { .. } => "ListError",
            Self::Download { .. } => "DownloadError",
            Self::Transcode(_) => "TranscodeError",
            Self::Probe { .. } => "ProbeError",
            Self::Decode { .. } => "DecodeError",
            Self::Thumbnail { .. } => "ThumbnailError",
            Self::Collage(_) => "CollageError",
            Self::Encode { .. } => "EncodeError",
            Self::AudioExtract(_) => "AudioExtractError",
            Self::Transcription(_) => "TranscriptionError",
            Self::Serialization(_) => "SerializationError",
            Self::Upload { .. } => "UploadError",
            Self::Delete { .. } => "DeleteError",
            Self::Workspace { .. } => "WorkspaceError",
            Self::WorkerPool(_) => "WorkerPoolError",
            Self::Io(_) => "IoError",
        }
    }
}
