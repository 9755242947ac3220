use imfilt_image::Image;

use super::{ChannelWeights, BW, GW, RW};
use crate::{error::ImgprocError, parallel};

/// The grayscale value of an RGB pixel, truncated to an integer.
///
/// * [`ChannelWeights::Luminance`]: `floor(0.299 * r + 0.587 * g + 0.114 * b)`
/// * [`ChannelWeights::Uniform`]: `floor((r + g + b) / 3)`
#[inline]
pub fn intensity(r: u8, g: u8, b: u8, weights: ChannelWeights) -> u8 {
    match weights {
        ChannelWeights::Luminance => (RW * r as f64 + GW * g as f64 + BW * b as f64) as u8,
        ChannelWeights::Uniform => ((r as u16 + g as u16 + b as u16) / 3) as u8,
    }
}

/// Convert an image to a single channel grayscale image.
///
/// RGB images go through [`intensity`]. A single channel image is already
/// gray and is returned as a copy, so the conversion is idempotent.
///
/// # Arguments
///
/// * `src` - The input image with 1 or 3 channels.
/// * `weights` - Luminance or plain average.
///
/// # Errors
///
/// Returns [`ImgprocError::UnsupportedChannelCount`] for other channel counts.
///
/// # Example
///
/// ```
/// use imfilt_image::Image;
/// use imfilt_imgproc::color::{to_grayscale, ChannelWeights};
///
/// let image = Image::<u8, 3>::new([2, 1].into(), vec![30, 60, 90, 0, 0, 255]).unwrap();
///
/// let gray = to_grayscale(&image, ChannelWeights::Uniform).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.as_slice(), &[60, 85]);
/// ```
pub fn to_grayscale<const C: usize>(
    src: &Image<u8, C>,
    weights: ChannelWeights,
) -> Result<Image<u8, 1>, ImgprocError> {
    match C {
        1 => Ok(src.channel(0)?),
        3 => {
            let mut dst = Image::from_size_val(src.size(), 0u8)?;
            parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
                dst_pixel[0] = intensity(src_pixel[0], src_pixel[1], src_pixel[2], weights);
            });
            Ok(dst)
        }
        _ => Err(ImgprocError::UnsupportedChannelCount(C, &[1, 3])),
    }
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_gray<T>(src: &Image<T, 1>, dst: &mut Image<T, 3>) -> Result<(), ImgprocError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(imfilt_image::ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(())
}
