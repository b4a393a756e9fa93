pub mod component;
pub mod config;
pub mod error;
pub mod init;
pub mod reporter;
pub mod signal;
pub mod tools;

pub use component::{ComposeOutcome, PosterComposer};
pub use config::PosterSettings;
pub use error::{
    BorderDetectionError, FrameExtractionError, MediaProbeError, MediaProcessingError,
    NoFramesExtractedError,
};
pub use reporter::{ConsoleReporter, Progress, Reporter, SilentReporter};
