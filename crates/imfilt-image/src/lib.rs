#![deny(missing_docs)]
//! Pixel buffer types shared by every filter in the workspace.

/// image representation with interleaved channels.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
