use crate::error::{PipelineError, PipelineResult};
use crate::tools::{FfmpegToolchain, WorkerPool, timemarks};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 縮圖擷取任務
#[derive(Debug, Clone)]
pub struct ThumbnailTask {
    pub video_path: PathBuf,
    pub timestamp: String,
    pub output_path: PathBuf,
    pub index: usize,
}

/// 建立縮圖任務列表，輸出檔名為 `thumbnail-<i>.jpg`（i 從 1 開始）
#[must_use]
pub fn create_thumbnail_tasks(
    video_path: &Path,
    count: usize,
    interval_seconds: f64,
    output_dir: &Path,
) -> Vec<ThumbnailTask> {
    timemarks(count, interval_seconds)
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| ThumbnailTask {
            video_path: video_path.to_path_buf(),
            timestamp,
            output_path: output_dir.join(format!("thumbnail-{}.jpg", i + 1)),
            index: i,
        })
        .collect()
}

/// 擷取單一縮圖
pub fn extract_thumbnail(
    toolchain: &FfmpegToolchain,
    task: &ThumbnailTask,
    resolution: &str,
) -> PipelineResult<PathBuf> {
    debug!(
        "擷取縮圖 {}: timestamp={}, resolution={}",
        task.index, task.timestamp, resolution
    );

    let command = toolchain.frame_command(
        &task.video_path,
        &task.timestamp,
        resolution,
        &task.output_path,
    );
    toolchain
        .run(command)
        .map_err(|e| PipelineError::Thumbnail {
            index: task.index,
            message: e.to_string(),
        })?;

    // 確認輸出檔案存在（seek 超過片尾時 ffmpeg 可能成功結束但不輸出）
    if !task.output_path.exists() {
        return Err(PipelineError::Thumbnail {
            index: task.index,
            message: format!("縮圖檔案未建立: {}", task.output_path.display()),
        });
    }

    Ok(task.output_path.clone())
}

/// 依時間點平行擷取縮圖，回傳依索引排序的檔案路徑
///
/// 任一張失敗即整組失敗，已產生的縮圖不會被使用
pub fn generate_thumbnails(
    toolchain: &FfmpegToolchain,
    pool: &WorkerPool,
    video_path: &Path,
    count: usize,
    interval_seconds: f64,
    resolution: &str,
    output_dir: &Path,
) -> PipelineResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| PipelineError::workspace(output_dir, e))?;

    let tasks = create_thumbnail_tasks(video_path, count, interval_seconds, output_dir);
    info!(
        "擷取 {} 張縮圖（每 {}s，{}，最多 {} 個同時執行）",
        tasks.len(),
        interval_seconds,
        resolution,
        pool.max_workers()
    );

    pool.map_ordered(&tasks, |_, task| {
        extract_thumbnail(toolchain, task, resolution).inspect_err(|e| {
            error!("{e}");
        })
    })
}
