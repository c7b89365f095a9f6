//! 媒體 metadata 擷取
//!
//! 影片透過 ffprobe，圖片只解析標頭。

mod image_metadata;
mod media_metadata;
mod video_metadata;

pub use image_metadata::extract_image_metadata;
pub use media_metadata::MediaMetadata;
pub use video_metadata::extract_video_metadata;
