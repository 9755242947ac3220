use num_traits::Zero;
use std::cmp::PartialOrd;

use imfilt_image::{Image, ImageError};

use crate::color::{to_grayscale, ChannelWeights};
use crate::error::ImgprocError;
use crate::parallel;

/// The largest threshold accepted by [`threshold_luminance`].
pub const MAX_LUMINANCE_THRESHOLD: u16 = 256;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use imfilt_image::{Image, ImageSize};
/// use imfilt_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Binarize an image on its grayscale value.
///
/// Each pixel is reduced with [`to_grayscale`], then set to 255 if the gray
/// value is strictly greater than `threshold` and to 0 otherwise. A threshold
/// of 255 or 256 therefore yields an all black mask.
///
/// # Arguments
///
/// * `src` - The input image with 1 or 3 channels.
/// * `threshold` - The threshold in `[0, 256]`.
/// * `weights` - Luminance or plain average reduction.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidArgument`] if `threshold` exceeds 256, before
/// anything is computed.
///
/// # Example
///
/// ```
/// use imfilt_image::Image;
/// use imfilt_imgproc::{color::ChannelWeights, threshold::threshold_luminance};
///
/// let image = Image::<u8, 3>::new([2, 1].into(), vec![10, 20, 30, 200, 210, 220]).unwrap();
///
/// let mask = threshold_luminance(&image, 128, ChannelWeights::Uniform).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 255]);
/// ```
pub fn threshold_luminance<const C: usize>(
    src: &Image<u8, C>,
    threshold: u16,
    weights: ChannelWeights,
) -> Result<Image<u8, 1>, ImgprocError> {
    if threshold > MAX_LUMINANCE_THRESHOLD {
        return Err(ImgprocError::InvalidArgument(format!(
            "threshold must be in [0, {MAX_LUMINANCE_THRESHOLD}], got {threshold}"
        )));
    }

    let gray = to_grayscale(src, weights)?;
    let mut mask = Image::from_size_val(gray.size(), 0u8)?;

    // no 8-bit sample is above 255
    if let Ok(threshold) = u8::try_from(threshold) {
        threshold_binary(&gray, &mut mask, threshold, 255)?;
    }

    Ok(mask)
}
