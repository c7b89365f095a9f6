//! 語音轉錄與字幕檔產生
//!
//! 轉錄是可選功能：沒有金鑰時整段略過，字幕也不會產生。

mod subtitle_writer;
mod whisper_client;

pub use subtitle_writer::{render_subtitle_track, render_subtitles};
pub use whisper_client::{
    Transcriber, Transcript, TranscriptSegment, WhisperClient, parse_transcription_response,
    transcribe,
};
