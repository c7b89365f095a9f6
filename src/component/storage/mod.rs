//! 物件儲存介面
//!
//! 佇列與成品都放在同一個 bucket，佇列只是其中一個資料夾。

mod local_store;
mod supabase_store;

pub use local_store::LocalStore;
pub use supabase_store::SupabaseStore;

use crate::config::{Config, StorageBackend};
use crate::error::PipelineResult;
use anyhow::{Context, Result};

/// 列出佇列時取得的物件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub mime_type: String,
}

/// 阻塞式的 key-value blob 儲存
pub trait BlobStore: Send + Sync {
    /// 列出 `prefix` 資料夾下的檔案（不含子資料夾）
    fn list(&self, prefix: &str) -> PipelineResult<Vec<StoredObject>>;

    fn download(&self, remote_path: &str) -> PipelineResult<Vec<u8>>;

    /// 上傳（覆寫既有檔案），回傳公開網址
    fn upload(&self, remote_path: &str, bytes: Vec<u8>, mime_type: &str) -> PipelineResult<String>;

    fn delete(&self, remote_path: &str) -> PipelineResult<()>;
}

/// 依設定建立儲存後端
pub fn open_store(config: &Config) -> Result<Box<dyn BlobStore>> {
    match config.storage_backend {
        StorageBackend::Supabase => {
            let store = SupabaseStore::from_config(config).context("無法建立 Supabase 客戶端")?;
            Ok(Box::new(store))
        }
        StorageBackend::Local => Ok(Box::new(LocalStore::new(&config.local_storage_root))),
    }
}
