use crate::error::{PipelineError, PipelineResult};
use crate::tools::FfmpegToolchain;
use log::info;
use std::path::Path;

/// 從清理後的影片擷取 MP3 音軌
pub fn extract_audio(toolchain: &FfmpegToolchain, input: &Path, output: &Path) -> PipelineResult<()> {
    toolchain
        .run(toolchain.audio_command(input, output))
        .map_err(PipelineError::AudioExtract)?;

    info!("音訊擷取完成: {}", output.display());
    Ok(())
}
