//! E2E 測試 - 以 ffmpeg 產生的測試影片跑完整的影片分支
//!
//! 需要 ffmpeg/ffprobe 以及 libx264、libmp3lame、libwebp 編碼器，缺少時自動跳過

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use media_queue_publisher::component::contact_sheet_generator::{build_collage, generate_thumbnails};
use media_queue_publisher::component::job_orchestrator::JobOrchestrator;
use media_queue_publisher::component::manifest_builder::Manifest;
use media_queue_publisher::component::metadata_extractor::extract_video_metadata;
use media_queue_publisher::component::storage::LocalStore;
use media_queue_publisher::component::transcription::{Transcriber, Transcript, TranscriptSegment};
use media_queue_publisher::config::Config;
use media_queue_publisher::error::PipelineResult;
use media_queue_publisher::tools::{FfmpegToolchain, WorkerPool, thumbnail_count};
use tempfile::TempDir;

/// 回傳固定內容的轉錄服務
struct FixedTranscriber;

impl Transcriber for FixedTranscriber {
    fn transcribe(&self, audio_path: &Path) -> PipelineResult<Transcript> {
        assert!(audio_path.exists(), "音訊檔應該存在");
        Ok(Transcript {
            language: Some("english".to_string()),
            segments: vec![
                TranscriptSegment {
                    start_seconds: 0.0,
                    end_seconds: 1.5,
                    text: " Hello there. ".to_string(),
                },
                TranscriptSegment {
                    start_seconds: 1.5,
                    end_seconds: 3.0,
                    text: "Goodbye.".to_string(),
                },
            ],
        })
    }
}

fn tools_available() -> bool {
    let encoders = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).to_string())
        .unwrap_or_default();
    let has_ffprobe = Command::new("ffprobe").arg("-version").output().is_ok();

    has_ffprobe
        && ["libx264", "libmp3lame", "libwebp"]
            .iter()
            .all(|encoder| encoders.contains(encoder))
}

/// 產生 3.5 秒、320x240、含音軌的測試影片（帶有應被清除的 title）
fn generate_test_video(path: &Path) {
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=3.5:size=320x240:rate=10",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:duration=3.5",
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-shortest",
            "-metadata",
            "title=secret",
            "-y",
        ])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "無法產生測試影片");
}

fn local_config(root: &Path) -> Config {
    Config::from_pairs([
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_ROOT", root.join("bucket").display().to_string()),
        ("WORKSPACE_DIR", root.join("temp").display().to_string()),
        ("THUMBNAIL_WIDTH", "64".to_string()),
        ("INTERVAL_SEC", "1".to_string()),
        ("COLLAGE_COLS", "2".to_string()),
        ("MAX_WORKERS", "2".to_string()),
        ("COMMAND_TIMEOUT_SECS", "120".to_string()),
    ])
    .unwrap()
}

fn enqueue_video(config: &Config, scratch: &Path, name: &str) {
    let source = scratch.join("source.mp4");
    generate_test_video(&source);
    let queue = config.local_storage_root.join(config.queue_prefix());
    fs::create_dir_all(&queue).unwrap();
    fs::copy(&source, queue.join(name)).unwrap();
}

/// 回傳唯一的成品資料夾與其名稱
fn published_folder(config: &Config) -> (PathBuf, String) {
    let folders: Vec<_> = fs::read_dir(config.local_storage_root.join("processed"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(folders.len(), 1, "應該只有一個成品資料夾");
    let stem = folders[0].file_name().unwrap().to_string_lossy().to_string();
    (folders[0].clone(), stem)
}

/// 測試完整影片分支（含轉錄）
#[test]
fn test_video_pipeline_with_transcription_e2e() {
    if !tools_available() {
        println!("跳過測試：ffmpeg/ffprobe 或所需編碼器不存在");
        return;
    }

    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    enqueue_video(&config, dir.path(), "clip.mp4");

    let orchestrator = JobOrchestrator::new(
        config.clone(),
        Box::new(LocalStore::new(&config.local_storage_root)),
        Some(Box::new(FixedTranscriber)),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    println!("=== 執行佇列 ===");
    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.published, 1, "失敗: {:?}", summary.failures);
    assert!(
        !config.local_storage_root.join("queue/clip.mp4").exists(),
        "佇列項目應已刪除"
    );
    assert!(!config.workspace_dir.exists(), "工作目錄應已清除");

    println!("=== 檢查成品 ===");
    let (folder, stem) = published_folder(&config);
    assert!(stem.starts_with("clip-"));
    for extension in ["mp4", "vtt", "mp3", "webp", "json"] {
        let path = folder.join(format!("{stem}.{extension}"));
        assert!(path.exists(), "缺少成品 {}", path.display());
    }

    let probe = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(folder.join(format!("{stem}.mp4")))
        .output()
        .unwrap();
    assert!(
        !String::from_utf8_lossy(&probe.stdout).contains("secret"),
        "原始 metadata 應已移除"
    );

    let subtitles = fs::read_to_string(folder.join(format!("{stem}.vtt"))).unwrap();
    assert_eq!(
        subtitles,
        "WEBVTT\n\n00:00:00,000 --> 00:00:01,500\nHello there.\n\n00:00:01,500 --> 00:00:03,000\nGoodbye.\n"
    );

    let manifest: Manifest =
        serde_json::from_slice(&fs::read(folder.join(format!("{stem}.json"))).unwrap()).unwrap();
    assert_eq!(manifest.metadata.width, 320);
    assert_eq!(manifest.metadata.height, 240);
    assert_eq!(manifest.metadata.aspect_ratio, "4:3");
    assert_eq!(manifest.metadata.mime_type, "video/mp4");
    assert_eq!(manifest.metadata.extension, ".mp4");

    let duration = manifest.metadata.duration_seconds.unwrap();
    assert!((3.0..4.0).contains(&duration), "長度: {duration}");

    let thumbnails = manifest.thumbnails.unwrap();
    assert_eq!(thumbnails.count, 3);
    assert_eq!(thumbnails.resolution, "64x48");
    assert!((thumbnails.interval_seconds - 1.0).abs() < f64::EPSILON);

    // 3 張縮圖、2 欄 → 2 列
    let collage = image::open(folder.join(format!("{stem}.webp"))).unwrap();
    assert_eq!((collage.width(), collage.height()), (128, 96));

    println!("✓ 影片分支 E2E 測試通過: {stem}");
}

/// 測試沒有轉錄服務時不產生字幕
#[test]
fn test_video_pipeline_without_transcription_e2e() {
    if !tools_available() {
        println!("跳過測試：ffmpeg/ffprobe 或所需編碼器不存在");
        return;
    }

    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    enqueue_video(&config, dir.path(), "no subs.mp4");

    let orchestrator = JobOrchestrator::new(
        config.clone(),
        Box::new(LocalStore::new(&config.local_storage_root)),
        None,
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    let summary = orchestrator.run().unwrap();
    assert_eq!(summary.published, 1, "失敗: {:?}", summary.failures);

    let (folder, stem) = published_folder(&config);
    assert!(stem.starts_with("no-subs-"));
    assert!(!folder.join(format!("{stem}.vtt")).exists(), "不應產生字幕");
    assert_eq!(fs::read_dir(&folder).unwrap().count(), 4);
}

/// 分階段測試：metadata → 縮圖 → 拼貼圖
#[test]
fn test_thumbnail_and_collage_stages_e2e() {
    if !tools_available() {
        println!("跳過測試：ffmpeg/ffprobe 或所需編碼器不存在");
        return;
    }

    let dir = TempDir::new().unwrap();
    let video = dir.path().join("stage.mp4");
    generate_test_video(&video);

    let config = local_config(dir.path());
    let toolchain = FfmpegToolchain::from_config(&config);
    let pool = WorkerPool::new(2).unwrap();

    println!("=== Stage A: 取得影片資訊 ===");
    let metadata = extract_video_metadata(&toolchain, &video).unwrap();
    let duration = metadata.duration_seconds.unwrap();
    let count = thumbnail_count(duration, 1.0);
    assert_eq!(count, 3);

    println!("=== Stage B: 擷取縮圖 ===");
    let thumbs_dir = dir.path().join("thumbs");
    let thumbnails =
        generate_thumbnails(&toolchain, &pool, &video, count, 1.0, "64x48", &thumbs_dir).unwrap();
    let names: Vec<_> = thumbnails
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["thumbnail-1.jpg", "thumbnail-2.jpg", "thumbnail-3.jpg"]);

    println!("=== Stage C: 合併拼貼圖 ===");
    let collage_path = dir.path().join("collage.jpg");
    let layout = build_collage(&pool, &thumbnails, 64, 48, 2, &collage_path).unwrap();
    assert_eq!(layout.canvas_size(), (128, 96));
    assert_eq!(layout.blank_cells(), 1);

    let collage = image::open(&collage_path).unwrap();
    assert_eq!((collage.width(), collage.height()), (128, 96));
}
