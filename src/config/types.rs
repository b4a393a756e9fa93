use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 240; // 1080p / 8
pub const DEFAULT_SECONDS_INCREMENT: u64 = 30;
pub const DEFAULT_FRAMES_PER_ROW: u32 = 10;
pub const DEFAULT_OUTPUT_FILE: &str = "output.bmp";

/// 預設設定檔名稱（位於目前工作目錄）
pub const SETTINGS_FILE_NAME: &str = "frame_poster.json";

/// 海報生成設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterSettings {
    /// 縮圖寬度（像素），縮圖長邊不會超過此值
    pub thumbnail_width: u32,
    /// 每張擷取畫面之間的間隔（秒）
    pub seconds_increment: u64,
    /// 每列縮圖數量
    pub frames_per_row: u32,
    /// 輸出檔案路徑
    pub output_path: PathBuf,
    /// 只估算輸出尺寸，不寫檔
    pub estimate_only: bool,
    /// 是否偵測並裁切黑邊
    pub crop_borders: bool,
    /// 是否移除開頭與結尾的暗畫面
    pub trim_dark_ends: bool,
    pub border_detector: BorderDetectorSettings,
    pub dark_frames: DarkFrameSettings,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            seconds_increment: DEFAULT_SECONDS_INCREMENT,
            frames_per_row: DEFAULT_FRAMES_PER_ROW,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            estimate_only: false,
            crop_borders: false,
            trim_dark_ends: false,
            border_detector: BorderDetectorSettings::default(),
            dark_frames: DarkFrameSettings::default(),
        }
    }
}

/// 黑邊偵測取樣設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderDetectorSettings {
    /// 第一張取樣畫面的時間點（秒）
    pub start_offset: u64,
    /// 取樣間隔（秒）
    pub interval: u64,
    /// 最多取樣幾張
    pub sample_count: usize,
    /// 二值化閾值，平均亮度大於此值視為畫面內容
    pub threshold: u8,
}

impl Default for BorderDetectorSettings {
    fn default() -> Self {
        Self {
            start_offset: 60,
            interval: 60,
            sample_count: 40,
            threshold: 5,
        }
    }
}

/// 片頭片尾暗畫面設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkFrameSettings {
    /// 感知亮度低於此值視為暗畫面
    pub brightness_threshold: f64,
    /// 頭尾各最多檢查幾張
    pub window: usize,
}

impl Default for DarkFrameSettings {
    fn default() -> Self {
        Self {
            brightness_threshold: 100.0,
            window: 10,
        }
    }
}
