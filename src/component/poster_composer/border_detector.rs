//! 黑邊（letterbox）偵測
//!
//! 黑邊在多張畫面中平均後仍維持黑色，畫面內容則會互相混合，
//! 因此平均影像二值化後的最大外輪廓即近似於實際畫面範圍。
//! 此啟發式方法不保證正確，失敗時呼叫端應退回完整畫面。

use super::thumbnail::load_frame;
use crate::config::BorderDetectorSettings;
use crate::error::BorderDetectionError;
use crate::tools::MediaSource;
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use log::{debug, warn};
use std::path::Path;

/// 裁切範圍（來源畫面像素座標，`x2`/`y2` 不含）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRectangle {
    pub x: u32,
    pub y: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropRectangle {
    #[must_use]
    pub const fn new(x: u32, y: u32, x2: u32, y2: u32) -> Self {
        Self { x, y, x2, y2 }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x)
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y)
    }

    /// 限制在畫面範圍內，裁切後沒有剩餘面積時回傳 `None`
    #[must_use]
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<Self> {
        let x2 = self.x2.min(width);
        let y2 = self.y2.min(height);
        (self.x < x2 && self.y < y2).then_some(Self::new(self.x, self.y, x2, y2))
    }
}

/// 從影片取樣並偵測裁切範圍
///
/// 取樣在第一次遇到影片結尾時停止；已知長度時不會嘗試超出長度的時間點
pub fn detect_crop_rectangle<M: MediaSource + ?Sized>(
    source: &M,
    scratch_dir: &Path,
    duration: Option<u64>,
    settings: &BorderDetectorSettings,
) -> Result<CropRectangle, BorderDetectionError> {
    let mut samples = Vec::with_capacity(settings.sample_count);

    for offset in sample_offsets(duration, settings) {
        let Some(path) = source.extract_frame(scratch_dir, offset)? else {
            debug!("黑邊取樣在 {offset}s 到達影片結尾");
            break;
        };
        let frame = load_frame(&path, offset)?;
        samples.push(frame.image.to_luma8());
    }

    if samples.is_empty() {
        return Err(BorderDetectionError::NoSamples);
    }

    debug!("黑邊偵測取樣 {} 張", samples.len());

    detect_border(&samples, settings.threshold).ok_or(BorderDetectionError::NoContour)
}

/// 取樣時間點
///
/// 已知長度不超過起始時間時，改從 0 秒開始並依長度平均分配
#[must_use]
pub fn sample_offsets(duration: Option<u64>, settings: &BorderDetectorSettings) -> Vec<u64> {
    let count = settings.sample_count;
    let (start, interval) = match duration {
        Some(total) if total <= settings.start_offset => {
            (0, (total / count.max(1) as u64).max(1))
        }
        _ => (settings.start_offset, settings.interval.max(1)),
    };

    (0..count as u64)
        .map(|i| start + i * interval)
        .take_while(|&offset| duration.is_none_or(|total| offset < total))
        .collect()
}

/// 由灰階取樣畫面推算裁切範圍
///
/// 1. 依序以 0.5 權重混合所有畫面
/// 2. 亮度大於 `threshold` 的像素設為 255，其餘為 0
/// 3. 取面積（外接矩形）最大的外輪廓，回傳其外接矩形
#[must_use]
pub fn detect_border(frames: &[GrayImage], threshold: u8) -> Option<CropRectangle> {
    let combined = blend_frames(frames)?;
    let (width, height) = combined.dimensions();
    let mask = binarize_padded(&combined, threshold);

    // 遮罩外圍多一圈背景，座標需減 1 才是原畫面位置
    find_contours::<u32>(&mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| {
            let xs = contour.points.iter().map(|p| p.x);
            let ys = contour.points.iter().map(|p| p.y);
            let (min_x, max_x) = (xs.clone().min()?, xs.max()?);
            let (min_y, max_y) = (ys.clone().min()?, ys.max()?);
            CropRectangle::new(min_x.saturating_sub(1), min_y.saturating_sub(1), max_x, max_y)
                .clamped_to(width, height)
        })
        .max_by_key(|rect| u64::from(rect.width()) * u64::from(rect.height()))
}

/// 逐張以 0.5/0.5 權重混合：combined = 0.5 * combined + 0.5 * next
///
/// 小數 .5 捨入至偶數；尺寸與第一張不同的畫面會被略過
fn blend_frames(frames: &[GrayImage]) -> Option<GrayImage> {
    let (first, rest) = frames.split_first()?;
    let mut combined = first.clone();

    for frame in rest {
        if frame.dimensions() != combined.dimensions() {
            warn!(
                "略過尺寸不符的取樣畫面: {:?} != {:?}",
                frame.dimensions(),
                combined.dimensions()
            );
            continue;
        }
        for (acc, next) in combined.pixels_mut().zip(frame.pixels()) {
            acc.0[0] = blend_half(acc.0[0], next.0[0]);
        }
    }

    Some(combined)
}

fn blend_half(a: u8, b: u8) -> u8 {
    let sum = u16::from(a) + u16::from(b);
    let half = sum / 2;
    let rounded = if sum % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    };
    rounded as u8
}

/// 二值化並在四周補上一圈 0，讓貼齊畫面邊緣的區域也能形成外輪廓
fn binarize_padded(image: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width + 2, height + 2, |x, y| {
        let inside = (1..=width).contains(&x) && (1..=height).contains(&y);
        if inside && image.get_pixel(x - 1, y - 1).0[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 64x48 畫面，上下各 8 像素黑邊，中間填入指定亮度
    fn letterboxed(brightness: u8) -> GrayImage {
        GrayImage::from_fn(64, 48, |_, y| {
            if (8..40).contains(&y) {
                Luma([brightness])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_detect_border_letterbox() {
        let frames = vec![letterboxed(60), letterboxed(180), letterboxed(20)];
        let rect = detect_border(&frames, 5).unwrap();
        assert_eq!(rect, CropRectangle::new(0, 8, 64, 40));
        assert_eq!(rect.width(), 64);
        assert_eq!(rect.height(), 32);
    }

    #[test]
    fn test_detect_border_picks_largest_region() {
        let mut frame = letterboxed(100);
        // 黑邊中的小亮點不應影響結果
        frame.put_pixel(2, 2, Luma([255]));
        frame.put_pixel(3, 2, Luma([255]));

        let rect = detect_border(&[frame], 5).unwrap();
        assert_eq!(rect, CropRectangle::new(0, 8, 64, 40));
    }

    #[test]
    fn test_detect_border_full_frame_without_border() {
        let frame = GrayImage::from_pixel(10, 8, Luma([255]));
        assert_eq!(
            detect_border(&[frame], 5),
            Some(CropRectangle::new(0, 0, 10, 8))
        );
    }

    #[test]
    fn test_detect_border_pillarbox_touching_top_and_bottom() {
        // 左右各 6 像素黑邊
        let frame = GrayImage::from_fn(40, 30, |x, _| {
            if (6..34).contains(&x) {
                Luma([200])
            } else {
                Luma([0])
            }
        });
        assert_eq!(
            detect_border(&[frame], 5),
            Some(CropRectangle::new(6, 0, 34, 30))
        );
    }

    #[test]
    fn test_detect_border_dark_corner() {
        let mut frame = GrayImage::from_pixel(20, 16, Luma([150]));
        frame.put_pixel(0, 0, Luma([0]));
        assert_eq!(
            detect_border(&[frame], 5),
            Some(CropRectangle::new(0, 0, 20, 16))
        );
    }

    #[test]
    fn test_detect_border_all_black() {
        let frames = vec![GrayImage::new(32, 24), GrayImage::new(32, 24)];
        assert_eq!(detect_border(&frames, 5), None);
    }

    #[test]
    fn test_detect_border_empty_input() {
        assert_eq!(detect_border(&[], 5), None);
    }

    #[test]
    fn test_blend_frames_weighting() {
        let a = GrayImage::from_pixel(2, 2, Luma([0]));
        let b = GrayImage::from_pixel(2, 2, Luma([100]));
        let c = GrayImage::from_pixel(2, 2, Luma([200]));

        // ((0 + 100) / 2 + 200) / 2 = 125
        let combined = blend_frames(&[a, b, c]).unwrap();
        assert_eq!(combined.get_pixel(0, 0).0[0], 125);
    }

    #[test]
    fn test_blend_half_rounds_to_even() {
        assert_eq!(blend_half(2, 3), 2);
        assert_eq!(blend_half(3, 4), 4);
        assert_eq!(blend_half(0, 1), 0);
        assert_eq!(blend_half(254, 255), 254);
        assert_eq!(blend_half(255, 255), 255);
        assert_eq!(blend_half(10, 20), 15);
    }

    #[test]
    fn test_blend_frames_skips_mismatched_sizes() {
        let a = GrayImage::from_pixel(4, 4, Luma([80]));
        let b = GrayImage::from_pixel(8, 8, Luma([255]));
        let combined = blend_frames(&[a, b]).unwrap();
        assert_eq!(combined.dimensions(), (4, 4));
        assert_eq!(combined.get_pixel(0, 0).0[0], 80);
    }

    #[test]
    fn test_sample_offsets_long_media() {
        let settings = BorderDetectorSettings::default();
        let offsets = sample_offsets(Some(7200), &settings);
        assert_eq!(offsets.len(), 40);
        assert_eq!(offsets[0], 60);
        assert_eq!(offsets[39], 60 * 40);
    }

    #[test]
    fn test_sample_offsets_stop_at_duration() {
        let settings = BorderDetectorSettings::default();
        assert_eq!(sample_offsets(Some(200), &settings), vec![60, 120, 180]);
    }

    #[test]
    fn test_sample_offsets_short_media_restart_at_zero() {
        let settings = BorderDetectorSettings::default();
        let offsets = sample_offsets(Some(45), &settings);
        assert_eq!(offsets[0], 0);
        assert!(offsets.iter().all(|&o| o < 45));
        assert_eq!(offsets.len(), 40);
    }

    #[test]
    fn test_sample_offsets_unknown_duration() {
        let settings = BorderDetectorSettings {
            sample_count: 3,
            ..BorderDetectorSettings::default()
        };
        assert_eq!(sample_offsets(None, &settings), vec![60, 120, 180]);
    }

    #[test]
    fn test_crop_rectangle_clamped_to_frame() {
        let rect = CropRectangle::new(10, 10, 500, 500);
        assert_eq!(
            rect.clamped_to(320, 180),
            Some(CropRectangle::new(10, 10, 320, 180))
        );
        assert_eq!(CropRectangle::new(400, 0, 500, 10).clamped_to(320, 180), None);
    }
}
