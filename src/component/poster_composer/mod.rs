//! 影片海報生成元件
//!
//! 每隔固定秒數擷取一張畫面，縮小後依序排成網格，輸出為單張圖片

mod border_detector;
mod dark_frame_trimmer;
mod grid_layout;
mod main;
mod poster_writer;
mod thumbnail;

pub use border_detector::{CropRectangle, detect_border, detect_crop_rectangle, sample_offsets};
pub use dark_frame_trimmer::{perceived_brightness, trim_dark_ends};
pub use grid_layout::{CanvasGeometry, OUTPUT_DPI, PosterEstimate, arrange_rows, row_spacing};
pub use main::{ComposeOutcome, PosterComposer};
pub use poster_writer::{read_bmp_resolution, read_jpeg_dpi, write_poster};
pub use thumbnail::{Frame, Thumbnail, load_frame, make_thumbnail};
