mod ffprobe_info;
mod frame_extractor;
mod media_source;
mod path_validator;

pub use ffprobe_info::probe_duration;
pub use frame_extractor::{extract_frame, format_timestamp, frame_output_path};
pub use media_source::{FfmpegMedia, MediaSource};
pub use path_validator::validate_media_file_exists;
