//! Filter operations
//!
//! This module provides spatial convolution for image processing.

/// Filter kernels
pub mod kernels;

/// 2D convolution engine
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;
