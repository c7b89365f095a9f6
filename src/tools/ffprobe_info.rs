use super::ffmpeg_command::FfmpegToolchain;
use crate::error::{PipelineError, PipelineResult};
use serde::Deserialize;
use std::path::Path;

/// ffprobe 解析後的影片資訊
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeInfo {
    pub duration_seconds: f64,
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(toolchain: &FfmpegToolchain, path: &Path) -> PipelineResult<ProbeInfo> {
    let output = toolchain
        .run(toolchain.probe_command(path))
        .map_err(|e| PipelineError::probe(path, e.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut info = parse_probe_output(&stdout).map_err(|message| PipelineError::probe(path, message))?;

    // 部分容器不回報 size，改用檔案大小
    if info.byte_size == 0 {
        info.byte_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }

    Ok(info)
}

/// 解析 ffprobe 的 JSON 輸出
pub fn parse_probe_output(json: &str) -> Result<ProbeInfo, String> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| format!("無法解析 ffprobe 輸出: {e}"))?;

    // 找到視訊串流
    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| "找不到視訊串流".to_string())?;

    let width = video_stream.width.ok_or("無法取得影片寬度")?;
    let height = video_stream.height.ok_or("無法取得影片高度")?;

    // 取得影片長度（優先從 format，其次從 stream）
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or("無法取得影片長度")?;

    let byte_size = probe
        .format
        .as_ref()
        .and_then(|f| f.size.as_ref())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(ProbeInfo {
        duration_seconds,
        byte_size,
        width,
        height,
    })
}
