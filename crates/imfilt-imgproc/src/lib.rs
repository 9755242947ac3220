#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color adjustment and grayscale conversion module.
pub mod color;

/// error types for the image processing operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// border handling for spatial operations.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

pub use crate::error::ImgprocError;
