use crate::config::types::{PosterSettings, SETTINGS_FILE_NAME};
use crate::error::MediaProcessingError;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

impl PosterSettings {
    /// 載入設定
    ///
    /// 有指定路徑時必須能讀取；未指定時嘗試讀取工作目錄下的
    /// `frame_poster.json`，不存在就使用預設值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Path::new(SETTINGS_FILE_NAME);
                if path.exists() {
                    Self::load_from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        debug!("已載入設定檔: {}", path.display());
        Ok(settings)
    }

    /// 檢查所有數值參數皆為正數
    pub fn validate(&self) -> Result<(), MediaProcessingError> {
        if self.thumbnail_width == 0 {
            return Err(MediaProcessingError::InvalidSettings(
                "thumbnail_width 必須大於 0".to_string(),
            ));
        }
        if self.seconds_increment == 0 {
            return Err(MediaProcessingError::InvalidSettings(
                "seconds_increment 必須大於 0".to_string(),
            ));
        }
        if self.frames_per_row == 0 {
            return Err(MediaProcessingError::InvalidSettings(
                "frames_per_row 必須大於 0".to_string(),
            ));
        }
        if self.crop_borders
            && (self.border_detector.interval == 0 || self.border_detector.sample_count == 0)
        {
            return Err(MediaProcessingError::InvalidSettings(
                "border_detector 的 interval 與 sample_count 必須大於 0".to_string(),
            ));
        }
        Ok(())
    }
}
