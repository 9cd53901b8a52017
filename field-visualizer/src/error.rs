use std::path::PathBuf;

use color_lib::UnknownColorScale;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidColorScale(#[from] UnknownColorScale),

    #[error("failed to write {}", .path.display())]
    FilesystemWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("canvas backend failed: {0}")]
    Backend(String),

    #[error("failed to encode the field raster")]
    Encode(#[from] image::ImageError),
}
