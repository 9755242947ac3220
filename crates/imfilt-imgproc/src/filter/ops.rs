use imfilt_image::Image;

use super::{filter2d, kernels};
use crate::error::ImgprocError;

/// Sharpen an image with the 3x3 edge enhancement kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
pub fn sharpen<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, C>, ImgprocError> {
    filter2d(src, &kernels::edge_enhance_3x3())
}

/// Blur an image using an NxN uniform kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The side of the kernel, must be odd.
pub fn box_blur<const C: usize>(
    src: &Image<u8, C>,
    kernel_size: usize,
) -> Result<Image<u8, C>, ImgprocError> {
    filter2d(src, &kernels::box_blur(kernel_size)?)
}

/// Blur an image with the 5x5 binomial kernel.
pub fn binomial_blur<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, C>, ImgprocError> {
    filter2d(src, &kernels::binomial_blur_5x5())
}

/// Blur an image using a gaussian kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The side of the kernel, must be odd.
/// * `sigma` - The sigma of the gaussian kernel.
pub fn gaussian_blur<const C: usize>(
    src: &Image<u8, C>,
    kernel_size: usize,
    sigma: f32,
) -> Result<Image<u8, C>, ImgprocError> {
    filter2d(src, &kernels::gaussian(kernel_size, sigma)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imfilt_image::ImageSize;

    fn checkerboard(size: usize) -> Result<Image<u8, 1>, ImgprocError> {
        let data = (0..size * size)
            .map(|i| if (i / size + i % size) % 2 == 0 { 0 } else { 255 })
            .collect();
        Ok(Image::new(
            ImageSize {
                width: size,
                height: size,
            },
            data,
        )?)
    }

    #[test]
    fn test_blurs_flatten_checkerboard() -> Result<(), ImgprocError> {
        let image = checkerboard(9)?;

        for out in [
            box_blur(&image, 3)?,
            binomial_blur(&image)?,
            gaussian_blur(&image, 5, 1.0)?,
        ] {
            assert_eq!(out.size(), image.size());
            // interior pixels lose the full 0/255 contrast
            let center = *out.get([4, 4, 0]).unwrap_or(&0);
            assert!(center > 0 && center < 255, "center {center}");
        }

        Ok(())
    }

    #[test]
    fn test_sharpen_keeps_flat_regions() -> Result<(), ImgprocError> {
        let image = Image::<u8, 3>::from_size_val([6, 6].into(), 42)?;
        assert_eq!(sharpen(&image)?, image);
        Ok(())
    }

    #[test]
    fn test_box_blur_even_size() -> Result<(), ImgprocError> {
        let image = checkerboard(9)?;
        let res = box_blur(&image, 4);
        assert!(matches!(res, Err(ImgprocError::InvalidKernel(_))));
        Ok(())
    }
}
