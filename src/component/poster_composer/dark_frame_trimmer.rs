use super::thumbnail::Thumbnail;
use crate::config::DarkFrameSettings;
use image::RgbImage;
use log::debug;

/// 移除片頭與片尾的暗畫面（淡入、黑底片名、片尾字幕等）
///
/// 頭尾各最多檢查 `window` 張；若全部都被判定為暗畫面則保留原樣
#[must_use]
pub fn trim_dark_ends(thumbnails: Vec<Thumbnail>, settings: &DarkFrameSettings) -> Vec<Thumbnail> {
    let is_dark =
        |thumbnail: &Thumbnail| perceived_brightness(&thumbnail.image) < settings.brightness_threshold;

    let leading = thumbnails
        .iter()
        .take(settings.window)
        .take_while(|t| is_dark(*t))
        .count();
    let trailing = thumbnails[leading..]
        .iter()
        .rev()
        .take(settings.window)
        .take_while(|t| is_dark(*t))
        .count();

    if leading + trailing >= thumbnails.len() {
        return thumbnails;
    }

    debug!("移除片頭 {leading} 張、片尾 {trailing} 張暗畫面");

    let end = thumbnails.len() - trailing;
    thumbnails.into_iter().take(end).skip(leading).collect()
}

/// 感知亮度：sqrt(0.241 R² + 0.691 G² + 0.068 B²)，R/G/B 為各通道的均方根值
#[must_use]
pub fn perceived_brightness(image: &RgbImage) -> f64 {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return 0.0;
    }

    let mut sums = [0.0_f64; 3];
    for pixel in image.pixels() {
        for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += f64::from(value) * f64::from(value);
        }
    }

    let [r, g, b] = sums.map(|sum| (sum / pixel_count as f64).sqrt());
    (0.241 * r * r + 0.691 * g * g + 0.068 * b * b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn thumbnail(value: u8, offset_seconds: u64) -> Thumbnail {
        Thumbnail {
            image: RgbImage::from_pixel(8, 4, Rgb([value, value, value])),
            offset_seconds,
        }
    }

    fn offsets(thumbnails: &[Thumbnail]) -> Vec<u64> {
        thumbnails.iter().map(|t| t.offset_seconds).collect()
    }

    #[test]
    fn test_perceived_brightness_grey() {
        // 灰階時三個係數總和為 1
        let image = RgbImage::from_pixel(4, 4, Rgb([120, 120, 120]));
        assert!((perceived_brightness(&image) - 120.0).abs() < 1e-9);
        assert!(perceived_brightness(&RgbImage::new(4, 4)).abs() < 1e-9);
    }

    #[test]
    fn test_trim_dark_ends() {
        let input = vec![
            thumbnail(0, 0),
            thumbnail(10, 30),
            thumbnail(200, 60),
            thumbnail(30, 90),
            thumbnail(180, 120),
            thumbnail(5, 150),
        ];
        let trimmed = trim_dark_ends(input, &DarkFrameSettings::default());
        assert_eq!(offsets(&trimmed), vec![60, 90, 120]);
    }

    #[test]
    fn test_trim_dark_ends_respects_window() {
        let input: Vec<_> = (0..5)
            .map(|i| thumbnail(0, i * 30))
            .chain(std::iter::once(thumbnail(200, 150)))
            .collect();
        let settings = DarkFrameSettings {
            window: 2,
            ..DarkFrameSettings::default()
        };
        let trimmed = trim_dark_ends(input, &settings);
        assert_eq!(offsets(&trimmed), vec![60, 90, 120, 150]);
    }

    #[test]
    fn test_trim_dark_ends_keeps_all_dark_input() {
        let input = vec![thumbnail(0, 0), thumbnail(0, 30)];
        let trimmed = trim_dark_ends(input, &DarkFrameSettings::default());
        assert_eq!(trimmed.len(), 2);
    }
}
