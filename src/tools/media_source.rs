use crate::error::{FrameExtractionError, MediaProbeError};
use crate::tools::{extract_frame, probe_duration};
use std::path::{Path, PathBuf};

/// 影片來源：提供長度探測與單張畫面擷取
///
/// 正式流程使用 [`FfmpegMedia`]；測試可以換成合成畫面的實作
pub trait MediaSource {
    fn media_path(&self) -> &Path;

    /// 影片總長度（秒），僅供進度條與尺寸估算參考
    fn probe_duration(&self) -> Result<u64, MediaProbeError>;

    /// 在 `offset_seconds` 擷取一張畫面到 `scratch_dir`，到達結尾時回傳 `None`
    fn extract_frame(
        &self,
        scratch_dir: &Path,
        offset_seconds: u64,
    ) -> Result<Option<PathBuf>, FrameExtractionError>;
}

impl<T: MediaSource + ?Sized> MediaSource for &T {
    fn media_path(&self) -> &Path {
        (**self).media_path()
    }

    fn probe_duration(&self) -> Result<u64, MediaProbeError> {
        (**self).probe_duration()
    }

    fn extract_frame(
        &self,
        scratch_dir: &Path,
        offset_seconds: u64,
    ) -> Result<Option<PathBuf>, FrameExtractionError> {
        (**self).extract_frame(scratch_dir, offset_seconds)
    }
}

/// 透過外部 ffprobe / ffmpeg 存取影片
#[derive(Debug, Clone)]
pub struct FfmpegMedia {
    path: PathBuf,
}

impl FfmpegMedia {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl MediaSource for FfmpegMedia {
    fn media_path(&self) -> &Path {
        &self.path
    }

    fn probe_duration(&self) -> Result<u64, MediaProbeError> {
        probe_duration(&self.path)
    }

    fn extract_frame(
        &self,
        scratch_dir: &Path,
        offset_seconds: u64,
    ) -> Result<Option<PathBuf>, FrameExtractionError> {
        extract_frame(&self.path, scratch_dir, offset_seconds)
    }
}
