//! 整合測試 - 以本機資料夾作為 bucket 驗證佇列處理流程
//!
//! 需要 ffmpeg 的測試在找不到工具時會自動跳過

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use image::{Rgb, RgbImage};
use media_queue_publisher::component::{JobOrchestrator, RunSummary};
use media_queue_publisher::component::manifest_builder::Manifest;
use media_queue_publisher::component::storage::{BlobStore, LocalStore, StoredObject};
use media_queue_publisher::config::Config;
use media_queue_publisher::error::{PipelineError, PipelineResult};
use tempfile::TempDir;

/// 包住 `LocalStore`，在第 N 次上傳或刪除時回傳錯誤
struct FlakyStore {
    inner: LocalStore,
    fail_upload_at: Option<usize>,
    fail_delete: bool,
    uploads: AtomicUsize,
}

impl FlakyStore {
    fn new(config: &Config, fail_upload_at: Option<usize>, fail_delete: bool) -> Self {
        Self {
            inner: LocalStore::new(&config.local_storage_root),
            fail_upload_at,
            fail_delete,
            uploads: AtomicUsize::new(0),
        }
    }
}

impl BlobStore for FlakyStore {
    fn list(&self, prefix: &str) -> PipelineResult<Vec<StoredObject>> {
        self.inner.list(prefix)
    }

    fn download(&self, remote_path: &str) -> PipelineResult<Vec<u8>> {
        self.inner.download(remote_path)
    }

    fn upload(&self, remote_path: &str, bytes: Vec<u8>, mime_type: &str) -> PipelineResult<String> {
        let attempt = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_upload_at == Some(attempt) {
            return Err(PipelineError::Upload {
                remote_path: remote_path.to_string(),
                message: "模擬上傳失敗".to_string(),
            });
        }
        self.inner.upload(remote_path, bytes, mime_type)
    }

    fn delete(&self, remote_path: &str) -> PipelineResult<()> {
        if self.fail_delete {
            return Err(PipelineError::Delete {
                remote_path: remote_path.to_string(),
                message: "模擬刪除失敗".to_string(),
            });
        }
        self.inner.delete(remote_path)
    }
}

fn local_config(root: &Path) -> Config {
    Config::from_pairs([
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_ROOT", root.join("bucket").display().to_string()),
        ("WORKSPACE_DIR", root.join("temp").display().to_string()),
        ("MAX_WORKERS", "2".to_string()),
    ])
    .unwrap()
}

fn orchestrator(config: &Config, shutdown: bool) -> JobOrchestrator {
    let store = Box::new(LocalStore::new(&config.local_storage_root));
    JobOrchestrator::new(
        config.clone(),
        store,
        None,
        Arc::new(AtomicBool::new(shutdown)),
    )
    .unwrap()
}

fn enqueue(config: &Config, name: &str, bytes: &[u8]) {
    let queue = config.local_storage_root.join(config.queue_prefix());
    fs::create_dir_all(&queue).unwrap();
    fs::write(queue.join(name), bytes).unwrap();
}

fn queue_file(config: &Config, name: &str) -> std::path::PathBuf {
    config.local_storage_root.join(config.queue_prefix()).join(name)
}

/// 假的 ffmpeg：把 `-i` 的輸入檔複製到最後一個參數，讓圖片分支不需要真的 ffmpeg
#[cfg(unix)]
fn fake_ffmpeg(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-ffmpeg");
    fs::write(
        &script,
        r#"#!/bin/sh
input=""
previous=""
for arg in "$@"; do
    if [ "$previous" = "-i" ]; then input="$arg"; fi
    previous="$arg"
    last="$arg"
done
cp "$input" "$last"
"#,
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// 佇列中放一張 PNG，並讓 ffmpeg 指向假的腳本
#[cfg(unix)]
fn image_job_config(dir: &Path) -> Config {
    let mut config = local_config(dir);
    config.ffmpeg_bin = fake_ffmpeg(dir).display().to_string();

    let png_path = dir.join("source.png");
    RgbImage::from_pixel(64, 48, Rgb([20, 120, 220]))
        .save(&png_path)
        .unwrap();
    enqueue(&config, "photo.png", &fs::read(&png_path).unwrap());
    config
}

#[cfg(unix)]
fn run_with_store(config: &Config, store: FlakyStore) -> RunSummary {
    JobOrchestrator::new(
        config.clone(),
        Box::new(store),
        None,
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap()
    .run()
    .unwrap()
}

fn ffmpeg_has_encoder(encoder: &str) -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(encoder))
        .unwrap_or(false)
}

/// 測試 1: 空佇列
#[test]
fn test_empty_queue() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());

    let summary = orchestrator(&config, false).run().unwrap();

    assert_eq!(summary.total, 0);
    assert!(!summary.has_failures());
    println!("✓ 空佇列測試通過");
}

/// 測試 2: 不支援的類型會被略過且保留在佇列中
#[test]
fn test_unsupported_item_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    enqueue(&config, "notes.txt", b"hello");

    let summary = orchestrator(&config, false).run().unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.published, 0);
    assert!(!summary.has_failures());
    assert!(queue_file(&config, "notes.txt").exists(), "佇列項目不應被刪除");
    assert!(
        !config.local_storage_root.join("processed").exists(),
        "不應產生任何成品"
    );
}

/// 測試 3: 損壞的影片會失敗，佇列項目保留，工作目錄被清除
#[test]
fn test_broken_video_fails_and_stays_queued() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    enqueue(&config, "broken.mp4", b"this is not a video");
    enqueue(&config, "readme.txt", b"skip me");

    let summary = orchestrator(&config, false).run().unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.skipped, 1, "失敗後應繼續處理下一個項目");
    assert_eq!(summary.failures[0].name, "broken.mp4");
    assert_eq!(summary.failures[0].kind, "TranscodeError");
    assert!(queue_file(&config, "broken.mp4").exists());
    assert!(!config.workspace_dir.exists(), "工作目錄應已清除");
}

/// 測試 4: FAIL_FAST 在第一個失敗後停止
#[test]
fn test_fail_fast_stops_after_first_failure() {
    let dir = TempDir::new().unwrap();
    let mut config = local_config(dir.path());
    config.fail_fast = true;
    enqueue(&config, "a-broken.mp4", b"garbage");
    enqueue(&config, "b-broken.mp4", b"garbage");

    let summary = orchestrator(&config, false).run().unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].name, "a-broken.mp4");
    assert!(queue_file(&config, "b-broken.mp4").exists());
}

/// 測試 5: 已收到中斷信號時不處理任何項目
#[test]
fn test_shutdown_before_start() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    enqueue(&config, "notes.txt", b"hello");

    let summary = orchestrator(&config, true).run().unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.published + summary.skipped + summary.failed(), 0);
}

/// 測試 6: 啟動時清除上次殘留的工作目錄
#[test]
fn test_stale_workspace_is_purged() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    fs::create_dir_all(config.workspace_dir.join("thumbs")).unwrap();
    fs::write(config.workspace_dir.join("collage.jpg"), b"stale").unwrap();

    orchestrator(&config, false).run().unwrap();

    assert!(!config.workspace_dir.exists());
}

/// 測試 7: 圖片分支發布 WebP 與 manifest 後刪除佇列項目
#[test]
fn test_image_branch_publishes() {
    if !ffmpeg_has_encoder("libwebp") {
        println!("跳過測試：ffmpeg 不存在或不支援 libwebp");
        return;
    }

    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());

    let png_path = dir.path().join("photo.png");
    RgbImage::from_pixel(640, 480, Rgb([200, 30, 30]))
        .save(&png_path)
        .unwrap();
    enqueue(&config, "My Photo.png", &fs::read(&png_path).unwrap());

    let summary = orchestrator(&config, false).run().unwrap();
    assert_eq!(summary.published, 1, "失敗: {:?}", summary.failures);
    assert!(!queue_file(&config, "My Photo.png").exists());

    let processed = config.local_storage_root.join("processed");
    let folders: Vec<_> = fs::read_dir(&processed)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(folders.len(), 1);

    let folder = &folders[0];
    let stem = folder.file_name().unwrap().to_string_lossy().to_string();
    assert!(stem.starts_with("My-Photo-"), "資料夾名稱: {stem}");
    assert!(folder.join(format!("{stem}.webp")).exists());

    let store = LocalStore::new(&config.local_storage_root);
    let manifest_bytes = store
        .download(&format!("processed/{stem}/{stem}.json"))
        .unwrap();
    let manifest: Manifest = serde_json::from_slice(&manifest_bytes).unwrap();

    assert_eq!(manifest.metadata.width, 640);
    assert_eq!(manifest.metadata.height, 480);
    assert_eq!(manifest.metadata.aspect_ratio, "4:3");
    assert_eq!(manifest.metadata.mime_type, "image/webp");
    assert_eq!(manifest.metadata.duration_seconds, None);
    assert!(manifest.thumbnails.is_none());
    println!("✓ 圖片分支測試通過: {stem}");
}

/// 測試 8: 上傳中途失敗時佇列項目保留，已上傳的成品不會回復
#[cfg(unix)]
#[test]
fn test_upload_failure_keeps_queue_item() {
    let dir = TempDir::new().unwrap();
    let config = image_job_config(dir.path());

    let summary = run_with_store(&config, FlakyStore::new(&config, Some(2), false));

    assert_eq!(summary.published, 0);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].name, "photo.png");
    assert_eq!(summary.failures[0].kind, "UploadError");
    assert!(queue_file(&config, "photo.png").exists(), "佇列項目不應被刪除");
    assert!(!config.workspace_dir.exists(), "工作目錄應已清除");

    // 第一個成品（WebP）已上傳，manifest 沒有
    let folder = fs::read_dir(config.local_storage_root.join("processed"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let names: Vec<_> = fs::read_dir(&folder)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".webp"), "成品: {names:?}");
}

/// 測試 9: 成品全部上傳但刪除佇列項目失敗時，項目仍算失敗且保留
#[cfg(unix)]
#[test]
fn test_delete_failure_keeps_queue_item() {
    let dir = TempDir::new().unwrap();
    let config = image_job_config(dir.path());

    let summary = run_with_store(&config, FlakyStore::new(&config, None, true));

    assert_eq!(summary.published, 0);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].kind, "DeleteError");
    assert!(queue_file(&config, "photo.png").exists(), "佇列項目不應被刪除");
    assert!(!config.workspace_dir.exists(), "工作目錄應已清除");
}

/// 測試 10: 儲存正常時同一個工作會發布並移除佇列項目
#[cfg(unix)]
#[test]
fn test_image_job_publishes_with_working_store() {
    let dir = TempDir::new().unwrap();
    let config = image_job_config(dir.path());

    let summary = run_with_store(&config, FlakyStore::new(&config, None, false));

    assert_eq!(summary.published, 1, "失敗: {:?}", summary.failures);
    assert!(!queue_file(&config, "photo.png").exists());
    assert!(!config.workspace_dir.exists());
}
