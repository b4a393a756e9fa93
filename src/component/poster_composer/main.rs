use super::border_detector::{CropRectangle, detect_crop_rectangle};
use super::dark_frame_trimmer::trim_dark_ends;
use super::grid_layout::{CanvasGeometry, PosterEstimate, arrange_rows};
use super::poster_writer::{output_format, write_poster};
use super::thumbnail::{Thumbnail, load_frame, make_thumbnail};
use crate::config::PosterSettings;
use crate::error::{MediaProcessingError, NoFramesExtractedError, Result};
use crate::reporter::{Progress, Reporter, percent_complete};
use crate::tools::{MediaSource, validate_media_file_exists};
use image::RgbImage;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 海報生成結果
#[derive(Debug, Clone)]
pub enum ComposeOutcome {
    /// 估算模式：只擷取一張畫面，不寫檔
    Estimated(PosterEstimate),
    Written {
        path: PathBuf,
        geometry: CanvasGeometry,
        frame_count: usize,
    },
}

/// 海報生成器
///
/// 流程：
/// A. 取得影片長度（失敗時進度條改為不定長度）
/// B. 偵測黑邊（選用，失敗時使用完整畫面）
/// C. 每隔固定秒數擷取畫面並縮小為縮圖
/// D. 移除片頭片尾暗畫面（選用）
/// E. 排列成網格並寫出海報
pub struct PosterComposer<'a, M: MediaSource> {
    settings: PosterSettings,
    source: M,
    reporter: &'a dyn Reporter,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a, M: MediaSource> PosterComposer<'a, M> {
    pub fn new(
        settings: PosterSettings,
        source: M,
        reporter: &'a dyn Reporter,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            settings,
            source,
            reporter,
            shutdown_signal,
        }
    }

    pub fn compose(&self) -> Result<ComposeOutcome> {
        self.settings.validate()?;
        validate_media_file_exists(self.source.media_path())?;
        if !self.settings.estimate_only {
            output_format(&self.settings.output_path)?;
        }

        let media_path = self.source.media_path();
        let media_name = media_path
            .file_name()
            .map_or_else(|| media_path.display().to_string(), |n| n.to_string_lossy().to_string());
        self.reporter.status(&format!("處理中 {media_name}"));

        // Stage A: 影片長度只用於進度條與估算
        let duration = match self.source.probe_duration() {
            Ok(seconds) => Some(seconds),
            Err(e) => {
                warn!("無法取得影片長度，改用不定長度進度: {e}");
                None
            }
        };

        // 暫存目錄在離開時（含錯誤路徑）自動刪除
        let scratch = tempfile::Builder::new()
            .prefix("frame_poster_")
            .tempdir()?;

        // Stage B: 估算模式只擷取一張畫面，不做黑邊取樣
        let crop = if self.settings.crop_borders && !self.settings.estimate_only {
            self.detect_crop(scratch.path(), duration)
        } else {
            None
        };

        // Stage C
        let extracted = self.extract_thumbnails(scratch.path(), duration, crop);
        self.reporter.finish_progress();

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!("無法清理暫存目錄 {}: {}", scratch_path.display(), e);
        }

        let thumbnails = extracted?;
        let Some(first) = thumbnails.first() else {
            return Err(NoFramesExtractedError {
                path: media_path.to_path_buf(),
            }
            .into());
        };
        let thumbnail_height = first.height();

        if self.settings.estimate_only {
            return Ok(ComposeOutcome::Estimated(
                self.report_estimate(thumbnail_height, duration),
            ));
        }

        // Stage D
        let thumbnails = if self.settings.trim_dark_ends {
            trim_dark_ends(thumbnails, &self.settings.dark_frames)
        } else {
            thumbnails
        };

        // Stage E
        let frame_count = thumbnails.len();
        self.reporter
            .status(&format!("已擷取 {frame_count} 張畫面"));

        let rows = arrange_rows(thumbnails, self.settings.frames_per_row as usize);
        let geometry = CanvasGeometry::new(
            rows.len() as u32,
            self.settings.thumbnail_width,
            self.settings.frames_per_row,
            thumbnail_height,
        );

        let (width_cm, height_cm) = geometry.physical_size_cm();
        self.reporter.status(&format!(
            "輸出圖片 {}x{} 像素，300 dpi 下約 {:.2}x{:.2} 公分",
            geometry.width, geometry.height, width_cm, height_cm
        ));

        let canvas = paint_canvas(&rows, &geometry);
        let path = write_poster(&canvas, &self.settings.output_path)?;

        self.reporter
            .status(&format!("輸出檔案已寫入 {}", path.display()));
        info!(
            "海報已建立: {} ({} 張畫面, {}x{})",
            path.display(),
            frame_count,
            geometry.width,
            geometry.height
        );

        Ok(ComposeOutcome::Written {
            path,
            geometry,
            frame_count,
        })
    }

    fn detect_crop(&self, scratch_dir: &Path, duration: Option<u64>) -> Option<CropRectangle> {
        match detect_crop_rectangle(
            &self.source,
            scratch_dir,
            duration,
            &self.settings.border_detector,
        ) {
            Ok(rect) => {
                info!(
                    "偵測到畫面範圍 ({}, {}) - ({}, {})",
                    rect.x, rect.y, rect.x2, rect.y2
                );
                Some(rect)
            }
            Err(e) => {
                warn!("黑邊偵測失敗，使用完整畫面: {e}");
                None
            }
        }
    }

    fn extract_thumbnails(
        &self,
        scratch_dir: &Path,
        duration: Option<u64>,
        crop: Option<CropRectangle>,
    ) -> Result<Vec<Thumbnail>> {
        let mut thumbnails = Vec::new();
        let mut offset = 0;

        if let Some(total) = duration {
            self.reporter
                .progress(Progress::Percent(percent_complete(0, total)));
        }

        loop {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，停止擷取");
                return Err(MediaProcessingError::Interrupted);
            }

            let Some(path) = self.source.extract_frame(scratch_dir, offset)? else {
                debug!("{offset}s 已超出影片結尾，共 {} 張", thumbnails.len());
                break;
            };

            let frame = load_frame(&path, offset)?;
            thumbnails.push(make_thumbnail(frame, crop, self.settings.thumbnail_width));

            // 估算只需要一張畫面
            if self.settings.estimate_only {
                self.reporter.progress(Progress::Percent(100.0));
                break;
            }

            self.reporter.progress(match duration {
                Some(total) => Progress::Percent(percent_complete(offset, total)),
                None => Progress::Indeterminate {
                    frames: thumbnails.len(),
                },
            });

            offset += self.settings.seconds_increment;
        }

        Ok(thumbnails)
    }

    /// 影片長度未知時，假設整部影片只有已擷取的這一張
    fn report_estimate(&self, thumbnail_height: u32, duration: Option<u64>) -> PosterEstimate {
        let total_seconds = duration.unwrap_or(self.settings.seconds_increment);
        let estimate = PosterEstimate::project(
            self.settings.thumbnail_width,
            self.settings.frames_per_row,
            thumbnail_height,
            total_seconds,
        );

        let (width_cm, height_cm) = estimate.physical_size_cm();
        self.reporter.status(&format!(
            "預估圖片 {}x{} 像素，300 dpi 下約 {:.2}x{:.2} 公分",
            estimate.width,
            estimate.rounded_height(),
            width_cm,
            height_cm
        ));

        estimate
    }
}

/// 依列由左至右、由上至下貼上縮圖
fn paint_canvas(rows: &[Vec<Thumbnail>], geometry: &CanvasGeometry) -> RgbImage {
    let mut canvas = RgbImage::new(geometry.width, geometry.height);

    for (row_index, row) in rows.iter().enumerate() {
        for (column_index, thumbnail) in row.iter().enumerate() {
            let (x, y) = geometry.cell_origin(row_index as u32, column_index as u32);
            image::imageops::replace(&mut canvas, &thumbnail.image, i64::from(x), i64::from(y));
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn thumbnail(value: u8) -> Thumbnail {
        Thumbnail {
            image: RgbImage::from_pixel(4, 3, Rgb([value, value, value])),
            offset_seconds: 0,
        }
    }

    #[test]
    fn test_paint_canvas_positions() {
        let rows = arrange_rows(vec![thumbnail(50), thumbnail(100), thumbnail(150)], 2);
        let geometry = CanvasGeometry::new(rows.len() as u32, 4, 2, 3);
        let canvas = paint_canvas(&rows, &geometry);

        // 間距 round(3 / 3) = 1
        assert_eq!(canvas.dimensions(), (8, 2 * 3 + 3));
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(0, 1), &Rgb([50, 50, 50]));
        assert_eq!(canvas.get_pixel(4, 1), &Rgb([100, 100, 100]));
        assert_eq!(canvas.get_pixel(0, 5), &Rgb([150, 150, 150]));
        // 最後一列未滿的位置保持黑色
        assert_eq!(canvas.get_pixel(4, 5), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(0, 8), &Rgb([0, 0, 0]));
    }
}
