use super::whisper_client::Transcript;
use crate::error::{PipelineError, PipelineResult};
use crate::tools::format_srt_timestamp;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const SUBTITLE_HEADER: &str = "WEBVTT";

/// 產生字幕內容：標頭後接每段 `start --> end` 與文字，段落以空行分隔
#[must_use]
pub fn render_subtitles(transcript: &Transcript) -> String {
    let mut blocks = vec![SUBTITLE_HEADER.to_string()];
    blocks.extend(transcript.segments.iter().map(|segment| {
        format!(
            "{} --> {}\n{}",
            format_srt_timestamp(segment.start_seconds),
            format_srt_timestamp(segment.end_seconds),
            segment.text.trim()
        )
    }));

    let mut content = blocks.join("\n\n");
    content.push('\n');
    content
}

/// 寫出字幕檔；沒有轉錄結果時不做任何事並回傳 `None`
pub fn render_subtitle_track(
    transcript: Option<&Transcript>,
    output_path: &Path,
) -> PipelineResult<Option<PathBuf>> {
    let Some(transcript) = transcript else {
        return Ok(None);
    };

    fs::write(output_path, render_subtitles(transcript))
        .map_err(|e| PipelineError::workspace(output_path, e))?;

    info!("字幕檔已產生: {}", output_path.display());
    Ok(Some(output_path.to_path_buf()))
}
