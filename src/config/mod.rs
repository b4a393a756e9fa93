pub mod load;
pub mod types;

pub use types::{
    BorderDetectorSettings, DEFAULT_FRAMES_PER_ROW, DEFAULT_OUTPUT_FILE,
    DEFAULT_SECONDS_INCREMENT, DEFAULT_THUMBNAIL_WIDTH, DarkFrameSettings, PosterSettings,
    SETTINGS_FILE_NAME,
};
