//! 縮圖與拼貼圖生成元件
//!
//! 兩階段流程：
//! A. 依固定間隔平行擷取縮圖
//! B. 縮放後合併為網格拼貼圖

mod collage_builder;
mod collage_layout;
mod thumbnail_extractor;

pub use collage_builder::build_collage;
pub use collage_layout::CollageLayout;
pub use thumbnail_extractor::{
    ThumbnailTask, create_thumbnail_tasks, extract_thumbnail, generate_thumbnails,
};
