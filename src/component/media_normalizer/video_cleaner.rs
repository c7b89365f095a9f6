use crate::error::{PipelineError, PipelineResult};
use crate::tools::FfmpegToolchain;
use log::info;
use std::path::Path;

/// 重新編碼為 H.264/AAC 並移除所有 metadata
///
/// 成功後後續階段只使用 `output`，原始檔不再被讀取
pub fn clean_video(toolchain: &FfmpegToolchain, input: &Path, output: &Path) -> PipelineResult<()> {
    toolchain
        .run(toolchain.clean_video_command(input, output))
        .map_err(PipelineError::Transcode)?;

    info!("影片清理完成: {}", output.display());
    Ok(())
}
