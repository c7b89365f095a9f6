use crate::error::{PipelineError, PipelineResult};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 單一工作獨佔的暫存資料夾
///
/// 同一時間只有一個工作使用，由協調器的循序迴圈保證
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 刪除整個暫存資料夾（不存在時不做事）
    pub fn purge(&self) -> PipelineResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!("已清除工作目錄: {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::workspace(&self.root, e)),
        }
    }

    /// 清空後重建，確保不會殘留上一個工作的檔案
    pub fn prepare(&self) -> PipelineResult<()> {
        self.purge()?;
        fs::create_dir_all(&self.root).map_err(|e| PipelineError::workspace(&self.root, e))
    }

    /// 工作結束後清除；失敗只記錄警告，下一個工作開始前會再清一次
    pub fn clear(&self) {
        if let Err(e) = self.purge() {
            warn!("無法清理工作目錄: {e}");
        }
    }

    /// 下載的原始檔，沿用來源副檔名
    #[must_use]
    pub fn source_file(&self, dotted_extension: &str) -> PathBuf {
        self.root.join(format!("original{dotted_extension}"))
    }

    /// 圖片轉檔輸出資料夾，避免來源本身是 `.webp` 時與輸出同名
    #[must_use]
    pub fn normalized_dir(&self) -> PathBuf {
        self.root.join("normalized")
    }

    #[must_use]
    pub fn clean_video(&self) -> PathBuf {
        self.root.join("clean.mp4")
    }

    #[must_use]
    pub fn thumbs_dir(&self) -> PathBuf {
        self.root.join("thumbs")
    }

    #[must_use]
    pub fn collage(&self) -> PathBuf {
        self.root.join("collage.jpg")
    }

    #[must_use]
    pub fn audio(&self) -> PathBuf {
        self.root.join("audio.mp3")
    }

    #[must_use]
    pub fn subtitles(&self) -> PathBuf {
        self.root.join("subtitles.vtt")
    }

    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.root.join("info.json")
    }
}
