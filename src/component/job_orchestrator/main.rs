use super::summary::{FailedItem, JobOutcome, RunSummary};
use super::upload_target::{JobArtifacts, PublishKey, UploadTarget, build_upload_targets};
use super::workspace::Workspace;
use crate::component::contact_sheet_generator::{build_collage, generate_thumbnails};
use crate::component::manifest_builder::{ThumbnailSummary, build_manifest};
use crate::component::media_normalizer::{clean_video, encode_single_webp, extract_audio};
use crate::component::metadata_extractor::{extract_image_metadata, extract_video_metadata};
use crate::component::storage::{BlobStore, StoredObject};
use crate::component::transcription::{Transcriber, render_subtitle_track, transcribe};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::tools::{FfmpegToolchain, MediaKind, WorkerPool, dotted_extension, thumbnail_count};
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 依序處理佇列中的每個項目：下載、轉換、上傳成品、刪除佇列項目
pub struct JobOrchestrator {
    config: Config,
    store: Box<dyn BlobStore>,
    transcriber: Option<Box<dyn Transcriber>>,
    toolchain: FfmpegToolchain,
    pool: WorkerPool,
    workspace: Workspace,
    shutdown_signal: Arc<AtomicBool>,
}

impl JobOrchestrator {
    pub fn new(
        config: Config,
        store: Box<dyn BlobStore>,
        transcriber: Option<Box<dyn Transcriber>>,
        shutdown_signal: Arc<AtomicBool>,
    ) -> PipelineResult<Self> {
        let toolchain = FfmpegToolchain::from_config(&config);
        let pool = WorkerPool::new(config.worker_limit())?;
        let workspace = Workspace::new(&config.workspace_dir);

        Ok(Self {
            config,
            store,
            transcriber,
            toolchain,
            pool,
            workspace,
            shutdown_signal,
        })
    }

    /// 處理一次佇列後結束
    ///
    /// 列出佇列失敗時整體中止；單一項目失敗只記錄，除非設定 `FAIL_FAST`
    pub fn run(&self) -> Result<RunSummary> {
        self.workspace
            .purge()
            .context("無法清除上次留下的工作目錄")?;

        let prefix = self.config.queue_prefix();
        let items = self
            .store
            .list(prefix)
            .with_context(|| format!("無法列出佇列 {prefix}"))?;

        info!("佇列 {prefix} 共有 {} 個項目", items.len());

        let mut summary = RunSummary {
            total: items.len(),
            ..RunSummary::default()
        };

        for item in &items {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，停止處理剩餘項目");
                break;
            }

            let job_id = short_job_id();
            info!("[{job_id}] 開始處理 {} ({})", item.name, item.mime_type);

            let result = self.process_item(item, &job_id);
            self.workspace.clear();

            match result {
                Ok(outcome) => {
                    match &outcome {
                        JobOutcome::Published { urls } => {
                            info!("[{job_id}] {} 已發布 {} 個檔案", item.name, urls.len());
                        }
                        JobOutcome::Skipped { reason } => {
                            warn!("[{job_id}] 略過 {}: {reason}", item.name);
                        }
                    }
                    summary.record(&outcome);
                }
                Err(e) => {
                    error!("[{job_id}] 處理 {} 失敗 ({}): {e}", item.name, e.kind());
                    summary.record_failure(FailedItem {
                        name: item.name.clone(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });

                    if self.config.fail_fast {
                        warn!("FAIL_FAST 已啟用，中止佇列處理");
                        break;
                    }
                }
            }
        }

        Ok(summary)
    }

    /// 處理單一佇列項目
    ///
    /// 只有全部成品上傳成功才會刪除佇列項目
    pub fn process_item(&self, item: &StoredObject, job_id: &str) -> PipelineResult<JobOutcome> {
        let is_video = match MediaKind::from_mime(&item.mime_type) {
            MediaKind::Video => true,
            MediaKind::Image => false,
            MediaKind::Unsupported(mime_type) => {
                return Ok(JobOutcome::Skipped {
                    reason: format!("不支援的媒體類型 {mime_type}"),
                });
            }
        };

        self.workspace.prepare()?;

        let remote_path = self.queue_path(&item.name);
        let bytes = self.store.download(&remote_path)?;
        let source = self
            .workspace
            .source_file(&dotted_extension(Path::new(&item.name)));
        fs::write(&source, bytes).map_err(|e| PipelineError::workspace(&source, e))?;
        info!("[{job_id}] 已下載 {remote_path}");

        let artifacts = if is_video {
            self.process_video(&source, job_id)?
        } else {
            self.process_image(&source, job_id)?
        };

        let key = PublishKey::for_source(&item.name);
        let targets = build_upload_targets(&artifacts, &key);
        let urls = self.publish(&targets, job_id)?;

        self.store.delete(&remote_path)?;
        info!("[{job_id}] 已從佇列移除 {remote_path}");

        Ok(JobOutcome::Published { urls })
    }

    fn process_video(&self, source: &Path, job_id: &str) -> PipelineResult<JobArtifacts> {
        let config = &self.config;

        info!("[{job_id}] 清除 metadata 並重新編碼");
        let video = self.workspace.clean_video();
        clean_video(&self.toolchain, source, &video)?;

        let metadata = extract_video_metadata(&self.toolchain, &video)?;
        let duration = metadata.duration_seconds.unwrap_or_default();

        let thumb_width = config.thumbnail_width;
        let thumb_height = metadata.scaled_height(thumb_width);
        let resolution = format!("{thumb_width}x{thumb_height}");
        let count = thumbnail_count(duration, config.interval_sec);

        info!("[{job_id}] 產生 {count} 張縮圖與拼貼圖");
        let thumbnails = generate_thumbnails(
            &self.toolchain,
            &self.pool,
            &video,
            count,
            config.interval_sec,
            &resolution,
            &self.workspace.thumbs_dir(),
        )?;

        let collage_jpeg = self.workspace.collage();
        build_collage(
            &self.pool,
            &thumbnails,
            thumb_width,
            thumb_height,
            config.collage_cols,
            &collage_jpeg,
        )?;
        let collage = encode_single_webp(
            &self.toolchain,
            &collage_jpeg,
            self.workspace.root(),
            config.webp_quality,
        )?;

        info!("[{job_id}] 擷取音訊");
        let audio = self.workspace.audio();
        extract_audio(&self.toolchain, &video, &audio)?;

        let transcript = transcribe(self.transcriber.as_deref(), &audio)?;
        let subtitles = render_subtitle_track(transcript.as_ref(), &self.workspace.subtitles())?;

        let manifest = build_manifest(
            metadata,
            Some(ThumbnailSummary {
                count: thumbnails.len(),
                interval_seconds: config.interval_sec,
                resolution,
            }),
        );
        let manifest_path = self.workspace.manifest();
        manifest.write_to(&manifest_path)?;

        Ok(JobArtifacts::Video {
            video,
            subtitles,
            audio,
            collage,
            manifest: manifest_path,
        })
    }

    fn process_image(&self, source: &Path, job_id: &str) -> PipelineResult<JobArtifacts> {
        info!("[{job_id}] 轉換圖片為 WebP");
        let output_dir = self.workspace.normalized_dir();
        fs::create_dir_all(&output_dir).map_err(|e| PipelineError::workspace(&output_dir, e))?;

        let image = encode_single_webp(
            &self.toolchain,
            source,
            &output_dir,
            self.config.webp_quality,
        )?;
        let metadata = extract_image_metadata(&image)?;

        let manifest_path = self.workspace.manifest();
        build_manifest(metadata, None).write_to(&manifest_path)?;

        Ok(JobArtifacts::Image {
            image,
            manifest: manifest_path,
        })
    }

    /// 依序上傳，第一個失敗即中止（已上傳的檔案不會回復）
    fn publish(&self, targets: &[UploadTarget], job_id: &str) -> PipelineResult<Vec<String>> {
        let mut urls = Vec::with_capacity(targets.len());
        for target in targets {
            let bytes = fs::read(&target.local_path)
                .map_err(|e| PipelineError::workspace(&target.local_path, e))?;
            let url = self
                .store
                .upload(&target.remote_path, bytes, target.mime_type)?;
            info!("[{job_id}] 已上傳 {}: {url}", target.label);
            urls.push(url);
        }
        Ok(urls)
    }

    fn queue_path(&self, name: &str) -> String {
        match self.config.queue_prefix() {
            "" => name.to_string(),
            prefix => format!("{prefix}/{name}"),
        }
    }
}

fn short_job_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
