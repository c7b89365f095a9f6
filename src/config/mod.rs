pub mod load;
pub mod types;

pub use types::{
    Config, DEFAULT_COLLAGE_COLS, DEFAULT_INTERVAL_SEC, DEFAULT_THUMBNAIL_WIDTH,
    DEFAULT_WEBP_QUALITY, StorageBackend,
};
