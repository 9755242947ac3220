use imfilt_image::Image;

use super::{ChannelWeights, BW, GW, RW};
use crate::{error::ImgprocError, parallel};

/// Signed per-channel percentages applied as a multiplicative delta.
///
/// Each channel becomes `old + trunc(old * pct / 100)`, saturated to `[0, 255]`.
/// Percentages are expected in `[-100, 100]` but are not restricted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorAdjustment {
    /// Red percentage.
    pub r: f64,
    /// Green percentage.
    pub g: f64,
    /// Blue percentage.
    pub b: f64,
}

impl ColorAdjustment {
    /// Create an adjustment from the three percentages.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// The same percentage on every channel.
    pub fn uniform(pct: f64) -> Self {
        Self::new(pct, pct, pct)
    }

    /// The percentage split by the luminance weights.
    pub fn luminance_weighted(pct: f64) -> Self {
        Self::new(pct * RW, pct * GW, pct * BW)
    }

    /// Build the adjustment for `pct` according to `weights`.
    pub fn weighted(pct: f64, weights: ChannelWeights) -> Self {
        match weights {
            ChannelWeights::Luminance => Self::luminance_weighted(pct),
            ChannelWeights::Uniform => Self::uniform(pct),
        }
    }

    fn validate(&self) -> Result<(), ImgprocError> {
        if [self.r, self.g, self.b].iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(ImgprocError::InvalidArgument(format!(
                "color percentages must be finite, got {self:?}"
            )))
        }
    }
}

#[inline]
fn adjust_channel(value: u8, pct: f64) -> u8 {
    let value = value as f64;
    let delta = (value * pct / 100.0).trunc();
    (value + delta).clamp(0.0, 255.0) as u8
}

/// Apply a color adjustment to an RGB image in place.
///
/// The channels are adjusted independently and the results saturate to
/// `[0, 255]` instead of wrapping.
///
/// # Arguments
///
/// * `image` - The RGB image to modify.
/// * `adjustment` - The per-channel percentages.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidArgument`] if a percentage is not finite.
/// The image is not modified in that case.
///
/// # Example
///
/// ```
/// use imfilt_image::Image;
/// use imfilt_imgproc::color::{adjust_color_inplace, ColorAdjustment};
///
/// let mut image = Image::<u8, 3>::new([1, 1].into(), vec![10, 20, 30]).unwrap();
///
/// adjust_color_inplace(&mut image, ColorAdjustment::new(100.0, 0.0, 0.0)).unwrap();
/// assert_eq!(image.as_slice(), &[20, 20, 30]);
/// ```
pub fn adjust_color_inplace(
    image: &mut Image<u8, 3>,
    adjustment: ColorAdjustment,
) -> Result<(), ImgprocError> {
    adjustment.validate()?;

    let ColorAdjustment { r, g, b } = adjustment;
    parallel::par_iter_rows_mut(image, |pixel| {
        pixel[0] = adjust_channel(pixel[0], r);
        pixel[1] = adjust_channel(pixel[1], g);
        pixel[2] = adjust_channel(pixel[2], b);
    });

    Ok(())
}

/// Apply a color adjustment and return the result as a new image.
///
/// Same as [`adjust_color_inplace`] but `src` is left untouched.
pub fn adjust_color(
    src: &Image<u8, 3>,
    adjustment: ColorAdjustment,
) -> Result<Image<u8, 3>, ImgprocError> {
    adjustment.validate()?;
    let mut dst = src.clone();
    adjust_color_inplace(&mut dst, adjustment)?;
    Ok(dst)
}

fn check_brightness(pct: f64) -> Result<(), ImgprocError> {
    if pct.is_finite() && pct >= 0.0 {
        Ok(())
    } else {
        Err(ImgprocError::InvalidArgument(format!(
            "brightness percentage must be >= 0, got {pct}"
        )))
    }
}

fn check_darkness(pct: f64) -> Result<(), ImgprocError> {
    if (0.0..=100.0).contains(&pct) {
        Ok(())
    } else {
        Err(ImgprocError::InvalidArgument(format!(
            "darkness percentage must be in [0, 100], got {pct}"
        )))
    }
}

/// Brighten an RGB image in place by `pct` percent.
///
/// # Arguments
///
/// * `image` - The RGB image to modify.
/// * `pct` - The percentage, must be >= 0.
/// * `weights` - Split `pct` by the luminance weights, or apply it to every channel.
pub fn brightness_inplace(
    image: &mut Image<u8, 3>,
    pct: f64,
    weights: ChannelWeights,
) -> Result<(), ImgprocError> {
    check_brightness(pct)?;
    adjust_color_inplace(image, ColorAdjustment::weighted(pct, weights))
}

/// Brighten an RGB image by `pct` percent and return a new image.
pub fn brightness(
    src: &Image<u8, 3>,
    pct: f64,
    weights: ChannelWeights,
) -> Result<Image<u8, 3>, ImgprocError> {
    check_brightness(pct)?;
    adjust_color(src, ColorAdjustment::weighted(pct, weights))
}

/// Darken an RGB image in place by `pct` percent.
///
/// # Arguments
///
/// * `image` - The RGB image to modify.
/// * `pct` - The percentage, must be in `[0, 100]`.
/// * `weights` - Split `pct` by the luminance weights, or apply it to every channel.
pub fn darkness_inplace(
    image: &mut Image<u8, 3>,
    pct: f64,
    weights: ChannelWeights,
) -> Result<(), ImgprocError> {
    check_darkness(pct)?;
    adjust_color_inplace(image, ColorAdjustment::weighted(-pct, weights))
}

/// Darken an RGB image by `pct` percent and return a new image.
pub fn darkness(
    src: &Image<u8, 3>,
    pct: f64,
    weights: ChannelWeights,
) -> Result<Image<u8, 3>, ImgprocError> {
    check_darkness(pct)?;
    adjust_color(src, ColorAdjustment::weighted(-pct, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imfilt_image::ImageSize;

    fn make_2x2_rgb() -> Result<Image<u8, 3>, ImgprocError> {
        Ok(Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
        )?)
    }

    #[test]
    fn test_adjust_channel() {
        assert_eq!(adjust_channel(10, 100.0), 20);
        assert_eq!(adjust_channel(5, -50.0), 3);
        assert_eq!(adjust_channel(200, 50.0), 255);
        assert_eq!(adjust_channel(200, -150.0), 0);
        assert_eq!(adjust_channel(7, 0.0), 7);
    }

    #[test]
    fn test_adjust_color_red_only() -> Result<(), ImgprocError> {
        let image = make_2x2_rgb()?;
        let out = adjust_color(&image, ColorAdjustment::new(100.0, 0.0, 0.0))?;

        // blue is computed from the blue input
        assert_eq!(out.pixel(0, 0), &[20, 20, 30]);
        assert_eq!(out.pixel(1, 0), &[80, 50, 60]);
        assert_eq!(out.pixel(0, 1), &[140, 80, 90]);
        assert_eq!(out.pixel(1, 1), &[200, 110, 120]);

        // the copy variant leaves the source alone
        assert_eq!(image, make_2x2_rgb()?);
        Ok(())
    }

    #[test]
    fn test_adjust_color_inplace_saturates() -> Result<(), ImgprocError> {
        let mut image = make_2x2_rgb()?;
        adjust_color_inplace(&mut image, ColorAdjustment::new(150.0, -200.0, 0.0))?;

        // 100 + 150 = 250, 40 + 60 = 100
        assert_eq!(image.pixel(1, 1), &[250, 0, 120]);
        assert_eq!(image.pixel(1, 0), &[100, 0, 60]);

        let mut bright = Image::<u8, 3>::from_size_val([1, 1].into(), 200)?;
        adjust_color_inplace(&mut bright, ColorAdjustment::uniform(50.0))?;
        assert_eq!(bright.as_slice(), &[255, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_adjust_color_rejects_nan() -> Result<(), ImgprocError> {
        let mut image = make_2x2_rgb()?;
        let res = adjust_color_inplace(&mut image, ColorAdjustment::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));
        assert_eq!(image, make_2x2_rgb()?);
        Ok(())
    }

    #[test]
    fn test_brightness() -> Result<(), ImgprocError> {
        let image = make_2x2_rgb()?;

        for weights in [ChannelWeights::Luminance, ChannelWeights::Uniform] {
            assert_eq!(brightness(&image, 0.0, weights)?, image);
        }

        let uniform = brightness(&image, 50.0, ChannelWeights::Uniform)?;
        assert_eq!(uniform.pixel(0, 0), &[15, 30, 45]);

        // green: 110 * (50 * 0.587) / 100 = 32.285
        let lum = brightness(&image, 50.0, ChannelWeights::Luminance)?;
        assert_eq!(lum.pixel(1, 1), &[114, 142, 126]);

        let res = brightness(&image, -1.0, ChannelWeights::Uniform);
        assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn test_brightness_inplace_aliases() -> Result<(), ImgprocError> {
        let mut image = make_2x2_rgb()?;
        brightness_inplace(&mut image, 100.0, ChannelWeights::Uniform)?;
        assert_eq!(image.pixel(0, 0), &[20, 40, 60]);
        Ok(())
    }

    #[test]
    fn test_darkness() -> Result<(), ImgprocError> {
        let image = make_2x2_rgb()?;

        let uniform = darkness(&image, 50.0, ChannelWeights::Uniform)?;
        assert_eq!(uniform.pixel(1, 1), &[50, 55, 60]);

        let black = darkness(&image, 100.0, ChannelWeights::Uniform)?;
        assert!(black.as_slice().iter().all(|&v| v == 0));

        let mut inplace = image.clone();
        darkness_inplace(&mut inplace, 50.0, ChannelWeights::Uniform)?;
        assert_eq!(inplace, uniform);

        for pct in [150.0, -1.0, f64::NAN] {
            let res = darkness(&image, pct, ChannelWeights::Luminance);
            assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));
        }

        let mut untouched = image.clone();
        assert!(darkness_inplace(&mut untouched, 150.0, ChannelWeights::Uniform).is_err());
        assert_eq!(untouched, image);
        Ok(())
    }
}
