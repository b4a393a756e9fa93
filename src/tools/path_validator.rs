use crate::error::MediaProcessingError;
use std::path::Path;

pub fn validate_media_file_exists(path: &Path) -> Result<(), MediaProcessingError> {
    if !path.is_file() {
        return Err(MediaProcessingError::MediaNotFound(path.to_path_buf()));
    }
    Ok(())
}
