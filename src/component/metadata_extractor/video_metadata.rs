use super::media_metadata::MediaMetadata;
use crate::error::PipelineResult;
use crate::tools::{FfmpegToolchain, dotted_extension, get_video_info, mime_for_path, reduce_ratio};
use log::debug;
use std::path::Path;

/// 以 ffprobe 取得清理後影片的 metadata
pub fn extract_video_metadata(
    toolchain: &FfmpegToolchain,
    video_path: &Path,
) -> PipelineResult<MediaMetadata> {
    let info = get_video_info(toolchain, video_path)?;

    debug!(
        "影片資訊 {}: {:.2}s, {}x{}, {} bytes",
        video_path.display(),
        info.duration_seconds,
        info.width,
        info.height,
        info.byte_size
    );

    Ok(MediaMetadata {
        duration_seconds: Some(info.duration_seconds),
        byte_size: info.byte_size,
        mime_type: mime_for_path(video_path),
        extension: dotted_extension(video_path),
        width: info.width,
        height: info.height,
        aspect_ratio: reduce_ratio(info.width, info.height),
    })
}
