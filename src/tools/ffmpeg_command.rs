use super::external_command::{CommandOutput, run_with_timeout};
use crate::config::Config;
use crate::error::CommandError;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// ffmpeg / ffprobe 呼叫介面
///
/// 每個方法只負責組出參數，實際執行一律經過 [`FfmpegToolchain::run`]
/// 以套用逾時。
#[derive(Debug, Clone)]
pub struct FfmpegToolchain {
    ffmpeg: String,
    ffprobe: String,
    timeout: Duration,
}

impl FfmpegToolchain {
    #[must_use]
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ffmpeg_bin.clone(),
            config.ffprobe_bin.clone(),
            config.command_timeout(),
        )
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn ffmpeg_base(&self) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);
        cmd
    }

    /// 重新編碼並移除所有容器 metadata（GPS、裝置、時間等）
    #[must_use]
    pub fn clean_video_command(&self, source: &Path, destination: &Path) -> Command {
        let mut cmd = self.ffmpeg_base();
        cmd.arg("-i").arg(source);
        cmd.args([
            "-map_metadata",
            "-1",
            "-map_chapters",
            "-1",
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-y",
        ]);
        cmd.arg(destination);
        cmd
    }

    /// 跳到 `timestamp` 擷取單一影格，輸出為指定解析度的 JPEG
    #[must_use]
    pub fn frame_command(
        &self,
        source: &Path,
        timestamp: &str,
        resolution: &str,
        destination: &Path,
    ) -> Command {
        let mut cmd = self.ffmpeg_base();
        cmd.args(["-ss", timestamp]);
        cmd.arg("-i").arg(source);
        cmd.args([
            "-frames:v",
            "1",
            "-an",
            "-sn",
            "-threads",
            "1",
            "-s",
            resolution,
            "-q:v",
            "2",
            "-y",
        ]);
        cmd.arg(destination);
        cmd
    }

    #[must_use]
    pub fn audio_command(&self, source: &Path, destination: &Path) -> Command {
        let mut cmd = self.ffmpeg_base();
        cmd.arg("-i").arg(source);
        cmd.args(["-vn", "-acodec", "libmp3lame", "-y"]);
        cmd.arg(destination);
        cmd
    }

    /// 以 libwebp 進行有損壓縮，`quality` 範圍 1–100
    #[must_use]
    pub fn webp_command(&self, source: &Path, destination: &Path, quality: u8) -> Command {
        let mut cmd = self.ffmpeg_base();
        cmd.arg("-i").arg(source);
        cmd.args(["-frames:v", "1", "-c:v", "libwebp", "-quality"]);
        cmd.arg(quality.to_string());
        cmd.args(["-map_metadata", "-1", "-y"]);
        cmd.arg(destination);
        cmd
    }

    #[must_use]
    pub fn probe_command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.ffprobe);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]);
        cmd.arg(path);
        cmd
    }

    pub fn run(&self, command: Command) -> Result<CommandOutput, CommandError> {
        run_with_timeout(command, self.timeout)
    }
}
