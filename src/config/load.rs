use crate::config::types::{Config, StorageBackend};
use anyhow::{Context, Result, bail};
use std::path::{Component, Path, PathBuf};

impl Config {
    /// 從環境變數（以及可選的 `.env`）載入設定並驗證
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("已載入 {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("無法讀取 .env"),
        }

        let config: Self = envy::from_env().context("無法解析環境變數設定")?;
        config.validate()?;
        Ok(config)
    }

    /// 從鍵值對載入設定，鍵名與環境變數相同
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let config: Self = envy::from_iter(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
            .context("無法解析設定")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thumbnail_width == 0 {
            bail!("THUMBNAIL_WIDTH 必須大於 0");
        }
        if !(self.interval_sec.is_finite() && self.interval_sec > 0.0) {
            bail!("INTERVAL_SEC 必須大於 0: {}", self.interval_sec);
        }
        if self.collage_cols == 0 {
            bail!("COLLAGE_COLS 必須大於 0");
        }
        if !(1..=100).contains(&self.webp_quality) {
            bail!("WEBP_QUALITY 必須介於 1 到 100: {}", self.webp_quality);
        }
        if self.command_timeout_secs == 0 || self.http_timeout_secs == 0 {
            bail!("逾時設定必須大於 0");
        }
        self.validate_workspace()?;
        if self.storage_backend == StorageBackend::Supabase {
            for (name, value) in [
                ("SUPABASE_URL", &self.supabase_url),
                ("SUPABASE_KEY", &self.supabase_key),
                ("SUPABASE_BUCKET", &self.supabase_bucket),
            ] {
                if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    bail!("使用 supabase 儲存時必須設定 {name}");
                }
            }
        }
        Ok(())
    }

    /// 工作目錄在啟動時會整個刪除，不可指向目前目錄或包住本機 bucket
    fn validate_workspace(&self) -> Result<()> {
        let workspace = lexical_absolute(&self.workspace_dir)
            .with_context(|| format!("無效的 WORKSPACE_DIR: {}", self.workspace_dir.display()))?;
        let current_dir = std::env::current_dir().context("無法取得目前目錄")?;

        if workspace.parent().is_none() || current_dir.starts_with(&workspace) {
            bail!(
                "WORKSPACE_DIR 不可為目前目錄或其上層: {}",
                self.workspace_dir.display()
            );
        }

        let storage_root = lexical_absolute(&self.local_storage_root).with_context(|| {
            format!("無效的 LOCAL_STORAGE_ROOT: {}", self.local_storage_root.display())
        })?;
        if storage_root.starts_with(&workspace) {
            bail!(
                "WORKSPACE_DIR 不可與 LOCAL_STORAGE_ROOT 相同或包含它: {} / {}",
                self.workspace_dir.display(),
                self.local_storage_root.display()
            );
        }
        Ok(())
    }
}

/// 轉成絕對路徑並消去 `.` 與 `..`（不解析符號連結）
fn lexical_absolute(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
