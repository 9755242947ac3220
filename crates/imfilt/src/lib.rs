#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use imfilt_image as image;

#[doc(inline)]
pub use imfilt_imgproc as imgproc;
