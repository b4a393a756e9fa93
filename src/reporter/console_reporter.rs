use super::{Progress, Reporter};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

const PERCENT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// 終端機輸出：狀態訊息加上 indicatif 進度條
///
/// 只在單一執行緒中使用，進度條以 `RefCell` 保存
pub struct ConsoleReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConsoleReporter {
    #[must_use]
    pub fn new(colour: bool) -> Self {
        // 未停用時交由 console 依終端機自動判斷
        if !colour {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self {
            bar: RefCell::new(None),
        }
    }

    fn percent_bar() -> ProgressBar {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(PERCENT_TEMPLATE)
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        bar
    }

    fn spinner() -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .expect("Invalid progress bar template"),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }
}

impl Reporter for ConsoleReporter {
    fn status(&self, message: &str) {
        let line = format!("{} {}", style("›").cyan(), message);
        match self.bar.borrow().as_ref() {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn progress(&self, progress: Progress) {
        let mut slot = self.bar.borrow_mut();
        match progress {
            Progress::Percent(percent) => {
                let bar = slot.get_or_insert_with(Self::percent_bar);
                bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
            }
            Progress::Indeterminate { frames } => {
                let bar = slot.get_or_insert_with(Self::spinner);
                bar.set_message(format!("已擷取 {frames} 張畫面"));
            }
        }
    }

    fn finish_progress(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_with_message("完成");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_lifecycle() {
        let reporter = ConsoleReporter::new(false);
        reporter.progress(Progress::Percent(42.0));
        assert_eq!(
            reporter.bar.borrow().as_ref().map(ProgressBar::position),
            Some(42)
        );

        reporter.progress(Progress::Percent(140.0));
        assert_eq!(
            reporter.bar.borrow().as_ref().map(ProgressBar::position),
            Some(100)
        );

        reporter.finish_progress();
        assert!(reporter.bar.borrow().is_none());
    }

    #[test]
    fn test_finish_without_progress_is_noop() {
        let reporter = ConsoleReporter::new(false);
        reporter.finish_progress();
        assert!(reporter.bar.borrow().is_none());
    }
}
