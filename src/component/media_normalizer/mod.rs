//! 媒體正規化：影片去除 metadata、圖片轉 WebP、擷取音軌

mod audio_extractor;
mod image_normalizer;
mod video_cleaner;

pub use audio_extractor::extract_audio;
pub use image_normalizer::{encode_single_webp, encode_webp, encode_webp_batch};
pub use video_cleaner::clean_video;
