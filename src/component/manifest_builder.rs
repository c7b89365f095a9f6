//! 工作 manifest：描述衍生 metadata 與縮圖設定的 JSON 紀錄

use crate::component::metadata_extractor::MediaMetadata;
use crate::error::{PipelineError, PipelineResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSummary {
    pub count: usize,
    pub interval_seconds: f64,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: MediaMetadata,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnails: Option<ThumbnailSummary>,
}

#[must_use]
pub const fn build_manifest(
    metadata: MediaMetadata,
    thumbnails: Option<ThumbnailSummary>,
) -> Manifest {
    Manifest {
        metadata,
        thumbnails,
    }
}

impl Manifest {
    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, output_path: &Path) -> PipelineResult<()> {
        let content = self.to_json()?;
        fs::write(output_path, content).map_err(|e| PipelineError::workspace(output_path, e))?;
        info!("manifest 已產生: {}", output_path.display());
        Ok(())
    }
}
