use super::grid_layout::OUTPUT_DPI;
use crate::error::MediaProcessingError;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{ImageFormat, RgbImage};
use log::{debug, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// BITMAPINFOHEADER 中 biXPelsPerMeter 的位置（biYPelsPerMeter 緊接其後）
const BMP_X_PELS_PER_METER_OFFSET: usize = 38;
const BMP_MIN_HEADER_LEN: usize = BMP_X_PELS_PER_METER_OFFSET + 8;

/// SOI + APP0 標頭後 JFIF 密度單位的位置，其後為 Xdensity / Ydensity（big-endian）
const JFIF_UNITS_OFFSET: usize = 13;
const JPEG_QUALITY: u8 = 75;

/// 依副檔名決定輸出格式
pub fn output_format(path: &Path) -> Result<ImageFormat, MediaProcessingError> {
    ImageFormat::from_path(path)
        .map_err(|_| MediaProcessingError::UnsupportedOutputFormat(path.to_path_buf()))
}

/// 編碼並寫入海報，回傳絕對路徑
///
/// 先在記憶體中完成編碼，失敗時不會留下不完整的檔案。
/// BMP 與 JPEG 會寫入 300 dpi 解析度，其他格式不含解析度資訊
pub fn write_poster(canvas: &RgbImage, output_path: &Path) -> Result<PathBuf, MediaProcessingError> {
    let format = output_format(output_path)?;

    let bytes = match format {
        ImageFormat::Jpeg => encode_jpeg(canvas)?,
        _ => {
            let mut buffer = Cursor::new(Vec::new());
            canvas.write_to(&mut buffer, format)?;
            let mut bytes = buffer.into_inner();
            if format == ImageFormat::Bmp && !stamp_bmp_resolution(&mut bytes, OUTPUT_DPI) {
                warn!("BMP 標頭格式不符，未寫入解析度");
            }
            bytes
        }
    };

    fs::write(output_path, &bytes)?;
    debug!("已寫入 {} bytes: {}", bytes.len(), output_path.display());

    Ok(std::path::absolute(output_path)?)
}

fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, MediaProcessingError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        encoder.set_pixel_density(PixelDensity::dpi(OUTPUT_DPI as u16));
        encoder.encode_image(canvas)?;
    }
    Ok(bytes)
}

/// 讀取 JFIF APP0 標頭中的每英吋像素數，單位不是英吋時回傳 `None`
#[must_use]
pub fn read_jpeg_dpi(bytes: &[u8]) -> Option<(u16, u16)> {
    let header = bytes.get(..JFIF_UNITS_OFFSET + 5)?;
    if !header.starts_with(&[0xFF, 0xD8, 0xFF, 0xE0]) || &header[6..11] != b"JFIF\0" {
        return None;
    }
    // 0x01 = dots per inch
    if header[JFIF_UNITS_OFFSET] != 0x01 {
        return None;
    }
    let x = u16::from_be_bytes([header[14], header[15]]);
    let y = u16::from_be_bytes([header[16], header[17]]);
    Some((x, y))
}

/// 將 dpi 換算為每公尺像素數並寫入 BMP 標頭
fn stamp_bmp_resolution(bytes: &mut [u8], dpi: f64) -> bool {
    if bytes.len() < BMP_MIN_HEADER_LEN || !bytes.starts_with(b"BM") {
        return false;
    }

    let pixels_per_meter = (dpi / 0.0254).round() as i32;
    let field = pixels_per_meter.to_le_bytes();
    let start = BMP_X_PELS_PER_METER_OFFSET;
    bytes[start..start + 4].copy_from_slice(&field);
    bytes[start + 4..start + 8].copy_from_slice(&field);
    true
}

/// 讀取 BMP 標頭中的水平/垂直每公尺像素數
#[must_use]
pub fn read_bmp_resolution(bytes: &[u8]) -> Option<(i32, i32)> {
    if bytes.len() < BMP_MIN_HEADER_LEN || !bytes.starts_with(b"BM") {
        return None;
    }
    let start = BMP_X_PELS_PER_METER_OFFSET;
    let x = i32::from_le_bytes(bytes[start..start + 4].try_into().ok()?);
    let y = i32::from_le_bytes(bytes[start + 4..start + 8].try_into().ok()?);
    Some((x, y))
}
