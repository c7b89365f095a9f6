use super::media_metadata::MediaMetadata;
use crate::error::{PipelineError, PipelineResult};
use crate::tools::{dotted_extension, mime_for_path, reduce_ratio};
use image::ImageReader;
use std::fs;
use std::path::Path;

/// 只讀取圖片標頭取得尺寸，不做完整解碼
pub fn extract_image_metadata(image_path: &Path) -> PipelineResult<MediaMetadata> {
    let decode_error = |message: String| PipelineError::Decode {
        path: image_path.to_path_buf(),
        message,
    };

    let byte_size = fs::metadata(image_path)
        .map_err(|e| decode_error(e.to_string()))?
        .len();

    let (width, height) = ImageReader::open(image_path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .into_dimensions()
        .map_err(|e| decode_error(e.to_string()))?;

    Ok(MediaMetadata {
        duration_seconds: None,
        byte_size,
        mime_type: mime_for_path(image_path),
        extension: dotted_extension(image_path),
        width,
        height,
        aspect_ratio: reduce_ratio(width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_extract_image_metadata_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let metadata = extract_image_metadata(&path).unwrap();
        assert_eq!(metadata.width, 64);
        assert_eq!(metadata.height, 48);
        assert_eq!(metadata.aspect_ratio, "4:3");
        assert_eq!(metadata.mime_type, "image/png");
        assert_eq!(metadata.extension, ".png");
        assert_eq!(metadata.byte_size, fs::metadata(&path).unwrap().len());
        assert!(metadata.duration_seconds.is_none());
    }

    #[test]
    fn test_extract_image_metadata_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.webp");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = extract_image_metadata(&path).unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }

    #[test]
    fn test_extract_image_metadata_missing_file() {
        let err = extract_image_metadata(Path::new("/nonexistent/x.png")).unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }
}
