use crate::error::FrameExtractionError;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 使用 ffmpeg 在指定時間點擷取單張畫面
///
/// 回傳值：
/// - `Ok(Some(path))`：畫面已寫入暫存目錄
/// - `Ok(None)`：時間點超出影片結尾（ffmpeg 正常結束但沒有輸出檔案）
/// - `Err(_)`：ffmpeg 無法執行或以錯誤狀態結束（損毀檔案、權限不足等）
pub fn extract_frame(
    video_path: &Path,
    scratch_dir: &Path,
    offset_seconds: u64,
) -> Result<Option<PathBuf>, FrameExtractionError> {
    let output_path = frame_output_path(scratch_dir, offset_seconds);
    let timestamp = format_timestamp(offset_seconds);

    debug!(
        "擷取畫面: {} @ {} -> {}",
        video_path.display(),
        timestamp,
        output_path.display()
    );

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-ss", &timestamp, "-i"])
        .arg(video_path)
        .args(["-frames:v", "1", "-y"])
        .arg(&output_path)
        .output()
        .map_err(FrameExtractionError::DecoderUnavailable)?;

    let outcome = ExtractionOutcome {
        offset_seconds,
        success: output.status.success(),
        exit_code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };
    let frame = outcome.into_frame(output_path)?;
    if frame.is_none() {
        debug!("{timestamp} 沒有畫面，視為影片結尾");
    }
    Ok(frame)
}

/// ffmpeg 結束狀態
///
/// 錯誤狀態一律視為失敗；正常結束但沒有輸出檔案才是影片結尾
struct ExtractionOutcome {
    offset_seconds: u64,
    success: bool,
    exit_code: Option<i32>,
    stderr: String,
}

impl ExtractionOutcome {
    fn into_frame(self, output_path: PathBuf) -> Result<Option<PathBuf>, FrameExtractionError> {
        if !self.success {
            return Err(FrameExtractionError::DecoderFailed {
                offset_seconds: self.offset_seconds,
                exit_code: self.exit_code,
                stderr: self.stderr,
            });
        }
        Ok(output_path.is_file().then_some(output_path))
    }
}

/// 暫存畫面檔名：`output-<秒數>.bmp`
#[must_use]
pub fn frame_output_path(scratch_dir: &Path, offset_seconds: u64) -> PathBuf {
    scratch_dir.join(format!("output-{offset_seconds}.bmp"))
}

/// 秒數轉為 ffmpeg `-ss` 使用的 `H:MM:SS`
#[must_use]
pub fn format_timestamp(offset_seconds: u64) -> String {
    let hours = offset_seconds / 3600;
    let minutes = (offset_seconds % 3600) / 60;
    let seconds = offset_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
