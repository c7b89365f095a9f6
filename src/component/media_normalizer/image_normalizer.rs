use crate::error::{PipelineError, PipelineResult};
use crate::tools::FfmpegToolchain;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 將單一圖片轉為 WebP，輸出 `<output_dir>/<stem>.webp`
pub fn encode_webp(
    toolchain: &FfmpegToolchain,
    input: &Path,
    output_dir: &Path,
    quality: u8,
) -> PipelineResult<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::encode(input, "無法取得檔名"))?;
    let output = output_dir.join(format!("{stem}.webp"));

    if output == input {
        return Err(PipelineError::encode(input, "輸出與輸入為同一檔案"));
    }

    toolchain
        .run(toolchain.webp_command(input, &output, quality))
        .map_err(|e| PipelineError::encode(input, e.to_string()))?;

    if !output.exists() {
        return Err(PipelineError::encode(input, "WebP 檔案未建立"));
    }

    Ok(output)
}

/// 批次轉為 WebP，失敗的檔案記錄後略過，只回傳成功的路徑
///
/// 成功轉檔後刪除原始檔
#[must_use]
pub fn encode_webp_batch(
    toolchain: &FfmpegToolchain,
    files: &[PathBuf],
    output_dir: &Path,
    quality: u8,
) -> Vec<PathBuf> {
    files
        .iter()
        .filter_map(|file| match encode_webp(toolchain, file, output_dir, quality) {
            Ok(output) => {
                info!("已轉為 WebP: {}", output.display());
                if let Err(e) = fs::remove_file(file) {
                    log::warn!("無法刪除原始檔 {}: {e}", file.display());
                }
                Some(output)
            }
            Err(e) => {
                error!("處理 {} 失敗: {e}", file.display());
                None
            }
        })
        .collect()
}

/// 轉換單一圖片，失敗時回傳 `EncodeError`
pub fn encode_single_webp(
    toolchain: &FfmpegToolchain,
    file: &Path,
    output_dir: &Path,
    quality: u8,
) -> PipelineResult<PathBuf> {
    encode_webp_batch(toolchain, &[file.to_path_buf()], output_dir, quality)
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::encode(file, "沒有成功轉換的檔案"))
}
