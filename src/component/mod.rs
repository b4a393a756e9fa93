//! 功能元件模組

pub mod poster_composer;

pub use poster_composer::{ComposeOutcome, PosterComposer};
