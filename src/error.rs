//! 錯誤型別
//!
//! 探測與邊框偵測失敗屬於可降級的錯誤，由呼叫端記錄後繼續；
//! 擷取、合成與寫檔失敗則一律包成 [`MediaProcessingError`] 往上拋。

use image::ImageError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 影片長度探測失敗（只影響進度條顯示）
#[derive(Debug, Error)]
pub enum MediaProbeError {
    #[error("無法執行 ffprobe: {0}")]
    ToolUnavailable(#[source] io::Error),

    #[error("ffprobe 執行失敗 ({}): {stderr}", path.display())]
    ToolFailed { path: PathBuf, stderr: String },

    #[error("找不到影片長度欄位: {}", path.display())]
    DurationNotFound { path: PathBuf },
}

/// 單張畫面擷取失敗（非 end-of-media）
#[derive(Debug, Error)]
pub enum FrameExtractionError {
    #[error("無法執行 ffmpeg: {0}")]
    DecoderUnavailable(#[source] io::Error),

    #[error("ffmpeg 擷取 {offset_seconds}s 畫面失敗 (exit code {exit_code:?}): {stderr}")]
    DecoderFailed {
        offset_seconds: u64,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("無法讀取擷取的畫面 {}: {source}", path.display())]
    UnreadableFrame {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// 邊框偵測失敗（停用裁切，改用完整畫面）
#[derive(Debug, Error)]
pub enum BorderDetectionError {
    #[error("無法取得任何取樣畫面")]
    NoSamples,

    #[error("遮罩中找不到任何輪廓")]
    NoContour,

    #[error(transparent)]
    Extraction(#[from] FrameExtractionError),
}

/// 第一次擷取就已到達影片結尾
#[derive(Debug, Error)]
#[error("無法從影片擷取任何畫面: {}", path.display())]
pub struct NoFramesExtractedError {
    pub path: PathBuf,
}

/// 整個流程的致命錯誤
#[derive(Debug, Error)]
pub enum MediaProcessingError {
    #[error("影片檔案不存在: {}", .0.display())]
    MediaNotFound(PathBuf),

    #[error("設定值無效: {0}")]
    InvalidSettings(String),

    #[error("不支援的輸出格式: {}", .0.display())]
    UnsupportedOutputFormat(PathBuf),

    #[error("操作已取消")]
    Interrupted,

    #[error(transparent)]
    NoFramesExtracted(#[from] NoFramesExtractedError),

    #[error("畫面擷取失敗: {0}")]
    Extraction(#[from] FrameExtractionError),

    #[error("影像處理失敗: {0}")]
    Image(#[from] ImageError),

    #[error("I/O 錯誤: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = MediaProcessingError> = std::result::Result<T, E>;
