/// 輸出解析度（dpi），用於換算實體尺寸與寫入 BMP 標頭
pub const OUTPUT_DPI: f64 = 300.0;

/// 依擷取順序排列成列，每列滿 `frames_per_row` 張就換下一列
///
/// 除了最後一列，每列都剛好 `frames_per_row` 張
#[must_use]
pub fn arrange_rows<T>(items: Vec<T>, frames_per_row: usize) -> Vec<Vec<T>> {
    let frames_per_row = frames_per_row.max(1);
    let mut rows: Vec<Vec<T>> = Vec::with_capacity(items.len().div_ceil(frames_per_row));
    let mut current: Vec<T> = Vec::with_capacity(frames_per_row);

    for item in items {
        current.push(item);
        if current.len() == frames_per_row {
            rows.push(std::mem::replace(
                &mut current,
                Vec::with_capacity(frames_per_row),
            ));
        }
    }

    if !current.is_empty() {
        rows.push(current);
    }

    rows
}

/// 列與列之間（含第一列之前、最後一列之後）的黑色間距
#[must_use]
pub fn row_spacing(thumbnail_height: u32) -> u32 {
    (f64::from(thumbnail_height) / 3.0).round() as u32
}

/// 畫布尺寸與各縮圖貼上位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub spacing: u32,
}

impl CanvasGeometry {
    /// 寬度 = 縮圖寬度 × 每列張數（與最後一列實際張數無關）
    /// 高度 = 列數 × 縮圖高度 + 間距 × (列數 + 1)
    #[must_use]
    pub fn new(
        row_count: u32,
        thumbnail_width: u32,
        frames_per_row: u32,
        thumbnail_height: u32,
    ) -> Self {
        let spacing = row_spacing(thumbnail_height);
        Self {
            width: thumbnail_width * frames_per_row,
            height: thumbnail_height * row_count + spacing * (row_count + 1),
            thumbnail_width,
            thumbnail_height,
            spacing,
        }
    }

    /// 第 `row` 列第 `column` 張縮圖的左上角座標
    #[must_use]
    pub const fn cell_origin(&self, row: u32, column: u32) -> (u32, u32) {
        let x = column * self.thumbnail_width;
        let y = row * self.thumbnail_height + self.spacing * (row + 1);
        (x, y)
    }

    #[must_use]
    pub fn physical_size_cm(&self) -> (f64, f64) {
        (pixels_to_cm(f64::from(self.width)), pixels_to_cm(f64::from(self.height)))
    }
}

/// 估算模式的預測尺寸
///
/// 只擷取了一張畫面，因此是以影片總秒數套用完整流程的公式推算，
/// 數值為預測而非實測
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosterEstimate {
    pub width: u32,
    pub height: f64,
}

impl PosterEstimate {
    /// 高度 = h × T / k + round(h / 3) × (T / k + 1)
    ///
    /// `T` 是影片總秒數，`k` 是每列張數，`h` 是第一張縮圖高度
    #[must_use]
    pub fn project(
        thumbnail_width: u32,
        frames_per_row: u32,
        thumbnail_height: u32,
        total_seconds: u64,
    ) -> Self {
        let projected_rows = total_seconds as f64 / f64::from(frames_per_row.max(1));
        let height = f64::from(thumbnail_height) * projected_rows
            + f64::from(row_spacing(thumbnail_height)) * (projected_rows + 1.0);

        Self {
            width: thumbnail_width * frames_per_row,
            height,
        }
    }

    #[must_use]
    pub fn rounded_height(&self) -> u64 {
        self.height.round() as u64
    }

    #[must_use]
    pub fn physical_size_cm(&self) -> (f64, f64) {
        (pixels_to_cm(f64::from(self.width)), pixels_to_cm(self.height))
    }
}

fn pixels_to_cm(pixels: f64) -> f64 {
    pixels / OUTPUT_DPI * 2.54
}
