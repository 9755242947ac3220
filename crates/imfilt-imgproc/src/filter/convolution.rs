use imfilt_image::{Image, ImageSize};
use log::{debug, trace, warn};

use super::kernels::Kernel;
use crate::error::ImgprocError;
use crate::padding::{spatial_padding, Padding2D, PaddingMode};
use crate::parallel::{self, CancellationToken, ExecutionStrategy};

/// How the weighted sum of a neighborhood is computed.
///
/// Both strategies visit the kernel taps in the same row-major order with
/// `f32` accumulation, so they produce identical images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationStrategy {
    /// Multiply-accumulate straight from the padded image, tap by tap.
    #[default]
    Direct,
    /// Copy the neighborhood into per-channel planes first, then reduce each
    /// plane against the kernel as a dot product.
    Blocked,
}

/// Options for [`filter2d_with`].
///
/// # Example
///
/// ```
/// use imfilt_imgproc::filter::{AccumulationStrategy, ConvolutionConfig};
/// use imfilt_imgproc::parallel::ExecutionStrategy;
///
/// let config = ConvolutionConfig::new()
///     .with_strategy(AccumulationStrategy::Blocked)
///     .with_execution(ExecutionStrategy::Serial);
///
/// assert_eq!(config.strategy, AccumulationStrategy::Blocked);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvolutionConfig {
    /// The accumulation strategy.
    pub strategy: AccumulationStrategy,
    /// How samples outside the image are produced. Defaults to edge replication.
    pub border: PaddingMode,
    /// The sample value used when `border` is [`PaddingMode::Constant`].
    pub border_value: u8,
    /// How output rows are scheduled.
    pub execution: ExecutionStrategy,
    /// Checked before each output row.
    pub cancel_token: Option<CancellationToken>,
}

impl ConvolutionConfig {
    /// The default configuration: direct accumulation, edge replication, parallel rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accumulation strategy.
    pub fn with_strategy(mut self, strategy: AccumulationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the border policy.
    pub fn with_border(mut self, border: PaddingMode) -> Self {
        self.border = border;
        self
    }

    /// Set the sample value for constant borders.
    pub fn with_border_value(mut self, value: u8) -> Self {
        self.border_value = value;
        self
    }

    /// Set the row scheduling.
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }
}

/// A `size`x`size` window into the padded image, anchored at `origin`.
struct Neighborhood<'a> {
    data: &'a [u8],
    stride: usize,
    origin: usize,
    size: usize,
}

impl<'a> Neighborhood<'a> {
    #[inline]
    fn row<const C: usize>(&self, ky: usize) -> &'a [u8] {
        let start = self.origin + ky * self.stride;
        &self.data[start..start + self.size * C]
    }
}

/// Reduces one neighborhood against the kernel weights, one sum per channel.
trait Accumulate: Sync {
    fn accumulate<const C: usize>(
        &self,
        window: &Neighborhood,
        weights: &[f32],
        scratch: &mut Vec<f32>,
    ) -> [f32; C];
}

struct DirectAccumulator;

impl Accumulate for DirectAccumulator {
    #[inline]
    fn accumulate<const C: usize>(
        &self,
        window: &Neighborhood,
        weights: &[f32],
        _scratch: &mut Vec<f32>,
    ) -> [f32; C] {
        let mut sum = [0.0f32; C];
        for (ky, kernel_row) in weights.chunks_exact(window.size).enumerate() {
            let row = window.row::<C>(ky);
            for (px, &w) in row.chunks_exact(C).zip(kernel_row) {
                for ch in 0..C {
                    sum[ch] += px[ch] as f32 * w;
                }
            }
        }
        sum
    }
}

struct BlockedAccumulator;

impl Accumulate for BlockedAccumulator {
    #[inline]
    fn accumulate<const C: usize>(
        &self,
        window: &Neighborhood,
        weights: &[f32],
        scratch: &mut Vec<f32>,
    ) -> [f32; C] {
        let taps = weights.len();
        scratch.resize(taps * C, 0.0);

        // deinterleave the window into one contiguous plane per channel
        for ky in 0..window.size {
            let row = window.row::<C>(ky);
            for (kx, px) in row.chunks_exact(C).enumerate() {
                let tap = ky * window.size + kx;
                for ch in 0..C {
                    scratch[ch * taps + tap] = px[ch] as f32;
                }
            }
        }

        let mut sum = [0.0f32; C];
        for (ch, plane) in scratch.chunks_exact(taps).enumerate() {
            sum[ch] = plane
                .iter()
                .zip(weights)
                .fold(0.0f32, |acc, (&v, &w)| acc + v * w);
        }
        sum
    }
}

/// Round to the nearest integer and saturate to the 8-bit range.
#[inline]
fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn check_dimensions(size: ImageSize, radius: usize) -> Result<(), ImgprocError> {
    if size.is_empty() {
        return Err(ImgprocError::DimensionMismatch(format!(
            "cannot filter an empty image: {size}"
        )));
    }
    let min_side = size.width.min(size.height);
    if 2 * radius >= min_side {
        return Err(ImgprocError::DimensionMismatch(format!(
            "kernel radius {radius} is too large for {size}"
        )));
    }
    Ok(())
}

/// The kernel weights in the window's row-major tap order.
///
/// Kernel entry `[i][j]` weights the neighbor at horizontal offset `i - r`
/// and vertical offset `j - r`, so tap `(ky, kx)` reads `kernel[kx][ky]`.
fn tap_weights(kernel: &Kernel) -> Vec<f32> {
    let n = kernel.size();
    let data = kernel.as_slice();
    (0..n)
        .flat_map(|ky| (0..n).map(move |kx| data[kx * n + ky]))
        .collect()
}

fn convolve_rows<A: Accumulate, const C: usize>(
    accumulator: &A,
    padded: &Image<u8, C>,
    kernel: &Kernel,
    dst: &mut Image<u8, C>,
    config: &ConvolutionConfig,
) -> Result<(), ImgprocError> {
    let width = dst.width();
    let padded_stride = padded.width() * C;
    let weights = tap_weights(kernel);

    parallel::execute_rows(
        config.execution,
        dst.as_slice_mut(),
        width * C,
        |y, dst_row| {
            if let Some(token) = &config.cancel_token {
                if token.is_cancelled() {
                    return Err(ImgprocError::Cancelled);
                }
            }

            let mut scratch = Vec::new();
            for (x, dst_px) in dst_row.chunks_exact_mut(C).enumerate() {
                let window = Neighborhood {
                    data: padded.as_slice(),
                    stride: padded_stride,
                    origin: y * padded_stride + x * C,
                    size: kernel.size(),
                };
                let sum = accumulator.accumulate::<C>(&window, &weights, &mut scratch);
                for (out, &s) in dst_px.iter_mut().zip(sum.iter()) {
                    *out = saturate_u8(s);
                }
            }
            Ok(())
        },
    )
}

/// Convolve an image with a square kernel using the default configuration.
///
/// Out-of-image neighbors are produced by edge replication. The sums are
/// accumulated in `f32`, rounded and saturated to `[0, 255]`. Rounding
/// rather than truncating keeps flat regions unchanged under normalized
/// blurs, whose `f32` sums can land just below the input value.
///
/// The kernel is applied as a correlation whose first index is the
/// horizontal offset: `kernel[i][j]` weights the neighbor at
/// `(x + i - r, y + j - r)`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The kernel, odd sized and square.
///
/// # Returns
///
/// A new image with the same size and channel count as `src`.
///
/// # Errors
///
/// * [`ImgprocError::InvalidKernel`] if the kernel is not odd sized and square.
/// * [`ImgprocError::DimensionMismatch`] if the image is empty, or its smaller
///   side is not larger than the kernel diameter `2 * radius`.
///
/// # Example
///
/// ```
/// use imfilt_image::Image;
/// use imfilt_imgproc::filter::{filter2d, kernels};
///
/// let image = Image::<u8, 3>::from_size_val([8, 8].into(), 100).unwrap();
/// let blurred = filter2d(&image, &kernels::box_blur(3).unwrap()).unwrap();
///
/// assert_eq!(blurred, image);
/// ```
pub fn filter2d<const C: usize>(
    src: &Image<u8, C>,
    kernel: &Kernel,
) -> Result<Image<u8, C>, ImgprocError> {
    filter2d_with(src, kernel, &ConvolutionConfig::default())
}

/// Convolve an image with a square kernel.
///
/// Same as [`filter2d`] with explicit accumulation strategy, border policy,
/// row scheduling and cancellation.
///
/// # Errors
///
/// In addition to the errors of [`filter2d`], returns
/// [`ImgprocError::Cancelled`] when the token in `config` is cancelled before
/// all rows are written. The partial output is discarded.
pub fn filter2d_with<const C: usize>(
    src: &Image<u8, C>,
    kernel: &Kernel,
    config: &ConvolutionConfig,
) -> Result<Image<u8, C>, ImgprocError> {
    kernel.validate()?;
    check_dimensions(src.size(), kernel.radius())?;

    debug!(
        "filter2d: {0}x{0} kernel on {1} ({C} channels), {2:?} accumulation, {3:?} execution",
        kernel.size(),
        src.size(),
        config.strategy,
        config.execution,
    );

    let padding = Padding2D::uniform(kernel.radius());
    let mut padded = Image::from_size_val(padding.padded_size(src.size()), 0u8)?;
    spatial_padding(
        src,
        &mut padded,
        padding,
        config.border,
        [config.border_value; C],
    )?;
    trace!("filter2d: padded to {} with {:?}", padded.size(), config.border);

    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    let res = match config.strategy {
        AccumulationStrategy::Direct => {
            convolve_rows(&DirectAccumulator, &padded, kernel, &mut dst, config)
        }
        AccumulationStrategy::Blocked => {
            convolve_rows(&BlockedAccumulator, &padded, kernel, &mut dst, config)
        }
    };

    if matches!(res, Err(ImgprocError::Cancelled)) {
        warn!("filter2d: cancelled, discarding partial output");
    }
    res?;

    Ok(dst)
}
