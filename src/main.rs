use anyhow::Result;
use clap::Parser;
use console::style;
use frame_poster::config::PosterSettings;
use frame_poster::init;
use frame_poster::signal::setup_shutdown_signal;
use frame_poster::tools::FfmpegMedia;
use frame_poster::{ComposeOutcome, ConsoleReporter, PosterComposer, Reporter, SilentReporter};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

/// 從影片每隔固定秒數擷取畫面，合成為單張海報
#[derive(Debug, Parser)]
#[command(name = "frame-poster", version)]
struct Cli {
    /// 影片檔案路徑
    media: PathBuf,

    /// 縮圖寬度（像素），預設 240
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..))]
    thumbnail_width: Option<u32>,

    /// 擷取間隔（秒），預設 30
    #[arg(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    seconds_increment: Option<u64>,

    /// 每列縮圖數量，預設 10
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..))]
    frames_per_row: Option<u32>,

    /// 輸出檔案路徑，預設 output.bmp
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// 只估算輸出尺寸，不寫檔
    #[arg(short = 'e', long)]
    estimate: bool,

    /// 偵測並裁切黑邊
    #[arg(long)]
    crop_borders: bool,

    /// 移除片頭片尾的暗畫面
    #[arg(long)]
    trim_dark_ends: bool,

    /// 設定檔路徑（預設讀取工作目錄下的 frame_poster.json）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 停用彩色輸出
    #[arg(long)]
    no_colour: bool,

    /// 顯示除錯日誌
    #[arg(short = 'v', long)]
    verbose: bool,

    /// 不顯示進度與狀態訊息
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    /// 命令列參數覆寫設定檔
    fn apply_to(&self, mut settings: PosterSettings) -> PosterSettings {
        if let Some(width) = self.thumbnail_width {
            settings.thumbnail_width = width;
        }
        if let Some(seconds) = self.seconds_increment {
            settings.seconds_increment = seconds;
        }
        if let Some(count) = self.frames_per_row {
            settings.frames_per_row = count;
        }
        if let Some(output) = &self.output {
            settings.output_path.clone_from(output);
        }
        settings.estimate_only |= self.estimate;
        settings.crop_borders |= self.crop_borders;
        settings.trim_dark_ends |= self.trim_dark_ends;
        settings
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = cli.apply_to(PosterSettings::load(cli.config.as_deref())?);
    let shutdown_signal = setup_shutdown_signal()?;

    let reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::new(!cli.no_colour))
    };

    let composer = PosterComposer::new(
        settings,
        FfmpegMedia::new(&cli.media),
        reporter.as_ref(),
        shutdown_signal,
    );

    match composer.compose()? {
        ComposeOutcome::Estimated(estimate) => {
            info!("估算完成: {}x{}", estimate.width, estimate.rounded_height());
        }
        ComposeOutcome::Written { path, .. } => {
            info!("Program exited normally: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_keep_settings() {
        let cli = Cli::parse_from(["frame-poster", "movie.mp4"]);
        let settings = cli.apply_to(PosterSettings::default());
        assert_eq!(settings, PosterSettings::default());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from([
            "frame-poster",
            "movie.mp4",
            "-w",
            "320",
            "-s",
            "15",
            "-r",
            "6",
            "-o",
            "poster.png",
            "--estimate",
            "--crop-borders",
        ]);
        let settings = cli.apply_to(PosterSettings::default());

        assert_eq!(settings.thumbnail_width, 320);
        assert_eq!(settings.seconds_increment, 15);
        assert_eq!(settings.frames_per_row, 6);
        assert_eq!(settings.output_path, PathBuf::from("poster.png"));
        assert!(settings.estimate_only);
        assert!(settings.crop_borders);
        assert!(!settings.trim_dark_ends);
    }

    #[test]
    fn test_cli_rejects_zero() {
        assert!(Cli::try_parse_from(["frame-poster", "movie.mp4", "-r", "0"]).is_err());
        assert!(Cli::try_parse_from(["frame-poster", "movie.mp4", "-s", "0"]).is_err());
    }
}
