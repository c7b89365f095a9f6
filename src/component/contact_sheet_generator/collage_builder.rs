use super::collage_layout::CollageLayout;
use crate::error::{PipelineError, PipelineResult};
use crate::tools::WorkerPool;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use log::{debug, info};
use std::path::{Path, PathBuf};

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// 將縮圖縮放後依序拼成網格圖，存成 JPEG
///
/// 縮放在執行緒池中平行進行，全部完成後才開始合成
pub fn build_collage(
    pool: &WorkerPool,
    thumbnails: &[PathBuf],
    cell_width: u32,
    cell_height: u32,
    cols: u32,
    output_path: &Path,
) -> PipelineResult<CollageLayout> {
    let layout = CollageLayout::new(thumbnails.len(), cols, cell_width, cell_height)
        .ok_or_else(|| PipelineError::Collage(format!("沒有可用的縮圖（cols={cols}）")))?;

    if cell_width == 0 || cell_height == 0 {
        return Err(PipelineError::Collage(format!(
            "縮圖尺寸無效: {cell_width}x{cell_height}"
        )));
    }

    let cells = pool.map_ordered(thumbnails, |_, path| {
        resize_cell(path, cell_width, cell_height)
    })?;

    let (canvas_width, canvas_height) = layout.canvas_size();
    debug!(
        "合併 {} 張縮圖為 {}x{} 網格，畫布 {}x{}",
        cells.len(),
        layout.cols,
        layout.rows,
        canvas_width,
        canvas_height
    );

    let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, BACKGROUND);
    for (index, cell) in cells.iter().enumerate() {
        let (x, y) = layout.cell_origin(index);
        imageops::overlay(&mut canvas, cell, i64::from(x), i64::from(y));
    }

    canvas
        .save_with_format(output_path, ImageFormat::Jpeg)
        .map_err(|e| PipelineError::Collage(format!("{}: {e}", output_path.display())))?;

    info!("拼貼圖已建立: {}", output_path.display());
    Ok(layout)
}

fn resize_cell(path: &Path, width: u32, height: u32) -> PipelineResult<RgbImage> {
    let image = image::open(path)
        .map_err(|e| PipelineError::Collage(format!("無法讀取縮圖 {}: {e}", path.display())))?;
    Ok(image.resize_exact(width, height, FilterType::Triangle).to_rgb8())
}
