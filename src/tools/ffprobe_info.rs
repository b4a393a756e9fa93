use crate::error::MediaProbeError;
use log::debug;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

/// ffprobe 診斷輸出中的長度欄位，例如 `Duration: 00:02:05.04, start: ...`
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s*(\d+):(\d{2}):(\d{2})").expect("duration regex is valid")
});

/// 使用 ffprobe 取得影片總長度（整數秒，小數部分捨去）
pub fn probe_duration(path: &Path) -> Result<u64, MediaProbeError> {
    let output = Command::new("ffprobe")
        .arg("-hide_banner")
        .arg(path)
        .output()
        .map_err(MediaProbeError::ToolUnavailable)?;

    // ffprobe 未指定輸出格式時，資訊都寫在 stderr
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(MediaProbeError::ToolFailed {
            path: path.to_path_buf(),
            stderr: stderr.trim().to_string(),
        });
    }

    let seconds = parse_duration(&stderr).ok_or_else(|| MediaProbeError::DurationNotFound {
        path: path.to_path_buf(),
    })?;

    debug!("影片長度 {}s: {}", seconds, path.display());
    Ok(seconds)
}

/// 解析 `HH:MM:SS` 長度欄位
fn parse_duration(output: &str) -> Option<u64> {
    let caps = DURATION_REGEX.captures(output)?;
    let hours: u64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;

    Some(hours * 3600 + minutes * 60 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_truncates_fraction() {
        let output = r"
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'movie.mp4':
  Duration: 00:02:05.94, start: 0.000000, bitrate: 1205 kb/s
  Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1920x1080
";
        assert_eq!(parse_duration(output), Some(125));
    }

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(
            parse_duration("  Duration: 01:32:10.00, start: 0.0"),
            Some(3600 + 32 * 60 + 10)
        );
    }

    #[test]
    fn test_parse_duration_not_available() {
        assert_eq!(parse_duration("  Duration: N/A, bitrate: N/A"), None);
        assert_eq!(parse_duration("no duration here"), None);
    }
}
