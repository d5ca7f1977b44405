/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image sizes do not match.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when a structuring element radius is too large.
    #[error("Invalid kernel radius: {0}")]
    InvalidKernelRadius(usize),
}
