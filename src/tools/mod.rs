mod aspect_ratio;
mod external_command;
mod ffmpeg_command;
mod ffprobe_info;
mod mime_type;
mod time_format;
mod worker_pool;

pub use aspect_ratio::{gcd, reduce_ratio};
pub use external_command::{CommandOutput, run_with_timeout};
pub use ffmpeg_command::FfmpegToolchain;
pub use ffprobe_info::{ProbeInfo, get_video_info, parse_probe_output};
pub use mime_type::{MediaKind, dotted_extension, mime_for_path};
pub use time_format::{format_seek_timestamp, format_srt_timestamp, thumbnail_count, timemarks};
pub use worker_pool::WorkerPool;
