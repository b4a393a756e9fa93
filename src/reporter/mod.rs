//! 進度與狀態輸出
//!
//! 由呼叫端建立後傳入 [`PosterComposer`](crate::component::PosterComposer)，不使用全域狀態

mod console_reporter;

pub use console_reporter::ConsoleReporter;

/// 進度更新
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// 已知影片長度時的百分比（0-100）
    Percent(f64),
    /// 影片長度未知時只回報已擷取張數
    Indeterminate { frames: usize },
}

pub trait Reporter {
    /// 輸出一行狀態訊息
    fn status(&self, message: &str);

    fn progress(&self, progress: Progress);

    /// 結束目前的進度條
    fn finish_progress(&self);
}

/// 不輸出任何內容
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn status(&self, _message: &str) {}

    fn progress(&self, _progress: Progress) {}

    fn finish_progress(&self) {}
}

/// 以影片長度換算進度百分比，最多 100
#[must_use]
pub fn percent_complete(offset_seconds: u64, total_seconds: u64) -> f64 {
    let percent = offset_seconds as f64 * 100.0 / total_seconds.max(1) as f64;
    percent.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_complete() {
        assert!((percent_complete(0, 125) - 0.0).abs() < f64::EPSILON);
        assert!((percent_complete(60, 120) - 50.0).abs() < f64::EPSILON);
        assert!((percent_complete(150, 125) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_complete_zero_total() {
        // 總長度為 0 時以 1 秒計算
        assert!((percent_complete(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((percent_complete(30, 0) - 100.0).abs() < f64::EPSILON);
    }
}
