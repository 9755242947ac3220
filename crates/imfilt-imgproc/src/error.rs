use imfilt_image::ImageError;

use crate::parallel::ParallelError;

/// Errors returned by the image processing operations.
///
/// Validation errors are raised before any output is written.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// A percentage or threshold parameter is outside its documented range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The kernel is not square, or its side is even or zero.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// The image is empty or too small for the requested kernel.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The operation only supports some channel counts.
    #[error("unsupported channel count {0}, expected one of {1:?}")]
    UnsupportedChannelCount(usize, &'static [usize]),

    /// The operation was cancelled between rows.
    #[error("operation cancelled")]
    Cancelled,

    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the parallel executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
