use super::border_detector::CropRectangle;
use crate::error::FrameExtractionError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use log::warn;
use std::fs;
use std::path::Path;

/// 擷取出的單張畫面
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: DynamicImage,
    /// 距影片開頭的秒數
    pub offset_seconds: u64,
}

/// 縮小後的畫面，長邊不超過設定的縮圖寬度
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub image: RgbImage,
    pub offset_seconds: u64,
}

impl Thumbnail {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// 讀取暫存畫面檔並立即刪除（節省磁碟空間）
pub fn load_frame(path: &Path, offset_seconds: u64) -> Result<Frame, FrameExtractionError> {
    let decoded = image::open(path);

    if let Err(e) = fs::remove_file(path) {
        warn!("無法刪除暫存畫面 {}: {}", path.display(), e);
    }

    let image = decoded.map_err(|source| FrameExtractionError::UnreadableFrame {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Frame {
        image,
        offset_seconds,
    })
}

/// 裁切（如有）後縮小為縮圖
///
/// 假設畫面為橫向（寬 >= 高），不做檢查
#[must_use]
pub fn make_thumbnail(frame: Frame, crop: Option<CropRectangle>, max_dimension: u32) -> Thumbnail {
    let Frame {
        image,
        offset_seconds,
    } = frame;

    let image = match crop.and_then(|rect| rect.clamped_to(image.width(), image.height())) {
        Some(rect) => image.crop_imm(rect.x, rect.y, rect.width(), rect.height()),
        None => image,
    };

    let (width, height) = fit_dimensions(image.width(), image.height(), max_dimension);
    let image = if (width, height) == (image.width(), image.height()) {
        image.to_rgb8()
    } else {
        image.resize_exact(width, height, FilterType::Triangle).to_rgb8()
    };

    Thumbnail {
        image,
        offset_seconds,
    }
}

/// 等比例縮小到長邊不超過 `max_dimension`，不放大
fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return (width, height);
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    let new_width = (f64::from(width) * scale).round() as u32;
    let new_height = (f64::from(height) * scale).round() as u32;
    (new_width.clamp(1, max_dimension), new_height.clamp(1, max_dimension))
}
