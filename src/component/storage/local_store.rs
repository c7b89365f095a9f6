use super::{BlobStore, StoredObject};
use crate::error::{PipelineError, PipelineResult};
use crate::tools::mime_for_path;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// 以本機資料夾模擬 bucket
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 遠端路徑對應到 root 底下的檔案，拒絕 `..` 與絕對路徑
    fn resolve(&self, remote_path: &str) -> Option<PathBuf> {
        let relative = Path::new(remote_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl BlobStore for LocalStore {
    fn list(&self, prefix: &str) -> PipelineResult<Vec<StoredObject>> {
        let list_error = |message: String| PipelineError::List {
            prefix: prefix.to_string(),
            message,
        };

        let directory = self
            .resolve(prefix)
            .ok_or_else(|| list_error("無效的路徑".to_string()))?;
        if !directory.is_dir() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            // 讀不到的項目不能當作佇列是空的
            let entry = entry.map_err(|e| list_error(e.to_string()))?;
            if entry.file_type().is_file() {
                objects.push(StoredObject {
                    name: entry.file_name().to_string_lossy().to_string(),
                    mime_type: mime_for_path(entry.path()),
                });
            }
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    fn download(&self, remote_path: &str) -> PipelineResult<Vec<u8>> {
        let download_error = |message: String| PipelineError::Download {
            remote_path: remote_path.to_string(),
            message,
        };

        let path = self
            .resolve(remote_path)
            .ok_or_else(|| download_error("無效的路徑".to_string()))?;
        fs::read(&path).map_err(|e| download_error(e.to_string()))
    }

    fn upload(&self, remote_path: &str, bytes: Vec<u8>, _mime_type: &str) -> PipelineResult<String> {
        let upload_error = |message: String| PipelineError::Upload {
            remote_path: remote_path.to_string(),
            message,
        };

        let path = self
            .resolve(remote_path)
            .ok_or_else(|| upload_error("無效的路徑".to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| upload_error(e.to_string()))?;
        }
        fs::write(&path, bytes).map_err(|e| upload_error(e.to_string()))?;

        let absolute = fs::canonicalize(&path).unwrap_or(path);
        Ok(format!("file://{}", absolute.display()))
    }

    fn delete(&self, remote_path: &str) -> PipelineResult<()> {
        let delete_error = |message: String| PipelineError::Delete {
            remote_path: remote_path.to_string(),
            message,
        };

        let path = self
            .resolve(remote_path)
            .ok_or_else(|| delete_error("無效的路徑".to_string()))?;
        fs::remove_file(&path).map_err(|e| delete_error(e.to_string()))
    }
}
