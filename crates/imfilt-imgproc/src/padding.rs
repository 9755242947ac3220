use imfilt_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Fill the border with a single, constant color value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// Repeat the outermost row or column of pixels into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Replicate,

    /// Mirror the pixel values at the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// Mirror the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Wrap the content from the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl PaddingMode {
    /// Maps a possibly out-of-range coordinate `i` to a valid index in `[0, len)`.
    ///
    /// Returns `None` for [`PaddingMode::Constant`] when `i` falls outside the
    /// image, meaning the caller should use the constant value. `len` must be > 0.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&i) {
            return Some(i as usize);
        }
        match self {
            PaddingMode::Constant => None,
            PaddingMode::Replicate => Some(i.clamp(0, n - 1) as usize),
            PaddingMode::Reflect => Some(mirror(i, n, false)),
            PaddingMode::Reflect101 => Some(mirror(i, n, true)),
            PaddingMode::Wrap => Some(i.rem_euclid(n) as usize),
        }
    }
}

// folds `i` back into [0, n); `skip_edge` excludes the border sample from the mirror
fn mirror(mut i: isize, n: isize, skip_edge: bool) -> usize {
    if n == 1 {
        return 0;
    }
    let shift = if skip_edge { 0 } else { 1 };
    while i < 0 || i >= n {
        i = if i < 0 {
            -i - shift
        } else {
            2 * n - i - 2 + shift
        };
    }
    i as usize
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on all four sides.
    pub fn uniform(amount: usize) -> Self {
        Self {
            top: amount,
            bottom: amount,
            left: amount,
            right: amount,
        }
    }

    /// The size of an image of `size` once this padding is applied.
    ///
    /// # Example
    /// ```rust
    /// use imfilt_image::ImageSize;
    /// use imfilt_imgproc::padding::Padding2D;
    ///
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let padded = padding.padded_size(ImageSize { width: 4, height: 4 });
    ///
    /// assert_eq!(padded, ImageSize { width: 8, height: 6 });
    /// ```
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Writes `src` into the centre of `dst` and fills the border according to `padding_mode`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, sized as `padding.padded_size(src.size())`.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The border handling policy.
/// * `constant_value` - The pixel used by [`PaddingMode::Constant`], one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the padded size of `src`,
/// or if `src` is empty and the mode needs source pixels to fill the border.
///
/// # Example
///
/// ```rust
/// use imfilt_image::Image;
/// use imfilt_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Image::<u8, 3>::from_size_val([2, 2].into(), 1).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val([4, 4].into(), 0).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Replicate, [0; 3]).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 1));
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = padding.padded_size(src.size());
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    if dst.size().is_empty() {
        return Ok(());
    }

    if src.size().is_empty() {
        if padding_mode != PaddingMode::Constant {
            return Err(ImageError::InvalidImageSize(
                src.width(),
                src.height(),
                1,
                1,
            ));
        }
        dst.as_slice_mut()
            .chunks_exact_mut(C)
            .for_each(|px| px.copy_from_slice(&constant_value));
        return Ok(());
    }

    let (src_w, src_h) = (src.width(), src.height());
    let src_stride = src_w * C;
    let src_data = src.as_slice();
    let dst_w = dst.width();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_w * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let sy = padding_mode.map_index(y as isize - padding.top as isize, src_h);
            let Some(sy) = sy else {
                dst_row
                    .chunks_exact_mut(C)
                    .for_each(|px| px.copy_from_slice(&constant_value));
                return;
            };
            let src_row = &src_data[sy * src_stride..(sy + 1) * src_stride];

            // the interior is a straight copy, only the side columns need remapping
            let inner = padding.left * C..padding.left * C + src_stride;
            dst_row[inner].copy_from_slice(src_row);

            let sides = (0..padding.left).chain(padding.left + src_w..dst_w);
            for x in sides {
                let dst_px = &mut dst_row[x * C..(x + 1) * C];
                match padding_mode.map_index(x as isize - padding.left as isize, src_w) {
                    Some(sx) => dst_px.copy_from_slice(&src_row[sx * C..(sx + 1) * C]),
                    None => dst_px.copy_from_slice(&constant_value),
                }
            }
        });

    Ok(())
}
