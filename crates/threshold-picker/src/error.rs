use std::path::PathBuf;

use threshold_picker_image::ImageError;
use threshold_picker_io::IoError;

/// An error type for the threshold picker application.
#[derive(thiserror::Error, Debug)]
pub enum PickerError {
    /// The input image could not be opened or decoded.
    #[error("cannot open image {}: {source}", path.display())]
    CannotOpenImage {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying decoding failure.
        source: IoError,
    },

    /// An image processing operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Reading user input or writing the menu failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    /// The Rerun viewer could not be spawned or fed.
    #[error("viewer error: {0}")]
    Viewer(#[from] rerun::RecordingStreamError),
}
