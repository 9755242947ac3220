use std::str::FromStr;

use crate::error::ImgprocError;

/// A square matrix of convolution weights with an odd side length.
///
/// The weights are stored row-major. When convolving, the first index is the
/// horizontal offset: `kernel[i][j]` weights the neighbor `i - r` columns and
/// `j - r` rows away. No normalization is applied: callers supply normalized
/// weights when the filter should preserve brightness.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from its side length and row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidKernel`] if `size` is zero or even, or if
    /// `data` does not hold exactly `size * size` weights.
    ///
    /// # Example
    ///
    /// ```
    /// use imfilt_imgproc::filter::kernels::Kernel;
    ///
    /// let kernel = Kernel::new(3, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(kernel.radius(), 1);
    ///
    /// assert!(Kernel::new(2, vec![0.25; 4]).is_err());
    /// ```
    pub fn new(size: usize, data: Vec<f32>) -> Result<Self, ImgprocError> {
        let kernel = Self { size, data };
        kernel.validate()?;
        Ok(kernel)
    }

    /// Create a kernel from nested rows, rejecting ragged or non-square input.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, ImgprocError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(ImgprocError::InvalidKernel(format!(
                    "kernel is not square: row {i} has {} weights, expected {size}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(size, data)
    }

    /// Build a separable kernel as the outer product of a 1-D kernel with itself.
    pub fn from_separable(kernel_1d: &[f32]) -> Result<Self, ImgprocError> {
        let data = kernel_1d
            .iter()
            .flat_map(|&ky| kernel_1d.iter().map(move |&kx| ky * kx))
            .collect();
        Self::new(kernel_1d.len(), data)
    }

    /// Check the odd square invariant.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        if self.size == 0 || self.size % 2 == 0 {
            return Err(ImgprocError::InvalidKernel(format!(
                "kernel side must be odd and positive, got {}",
                self.size
            )));
        }
        if self.data.len() != self.size * self.size {
            return Err(ImgprocError::InvalidKernel(format!(
                "kernel is not square: {} weights for side {}",
                self.data.len(),
                self.size
            )));
        }
        Ok(())
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of neighbor rings, `(size - 1) / 2`.
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    /// The row-major weights.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The weight at `(row, col)`, or `None` outside the kernel.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.data.get(row * self.size + col).copied()
    }

    /// The sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

/// The identity kernel of side `size`: 1 in the centre and 0 elsewhere.
pub fn identity(size: usize) -> Result<Kernel, ImgprocError> {
    let mut data = vec![0.0; size * size];
    if let Some(center) = data.get_mut(size * size / 2) {
        *center = 1.0;
    }
    Kernel::new(size, data)
}

/// 3x3 edge enhancement (sharpen): 5 in the centre, -1 on the four orthogonal neighbours.
pub fn edge_enhance_3x3() -> Kernel {
    Kernel {
        size: 3,
        #[rustfmt::skip]
        data: vec![
             0.0, -1.0,  0.0,
            -1.0,  5.0, -1.0,
             0.0, -1.0,  0.0,
        ],
    }
}

/// 3x3 uniform blur, every weight 1/9.
pub fn box_blur_3x3() -> Kernel {
    Kernel {
        size: 3,
        data: vec![1.0 / 9.0; 9],
    }
}

/// 5x5 binomial blur, the outer product of `[1, 4, 6, 4, 1] / 16`.
pub fn binomial_blur_5x5() -> Kernel {
    #[rustfmt::skip]
    let weights: [f32; 25] = [
        1.0,  4.0,  6.0,  4.0, 1.0,
        4.0, 16.0, 24.0, 16.0, 4.0,
        6.0, 24.0, 36.0, 24.0, 6.0,
        4.0, 16.0, 24.0, 16.0, 4.0,
        1.0,  4.0,  6.0,  4.0, 1.0,
    ];
    Kernel {
        size: 5,
        data: weights.iter().map(|w| w / 256.0).collect(),
    }
}

/// Create an NxN uniform blur kernel, every weight `1 / N²`.
///
/// # Arguments
///
/// * `kernel_size` - The side of the kernel, must be odd.
pub fn box_blur(kernel_size: usize) -> Result<Kernel, ImgprocError> {
    let n = kernel_size * kernel_size;
    Kernel::new(kernel_size, vec![1.0 / n as f32; n])
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = kernel_size.saturating_sub(1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create a 2D gaussian kernel of side `kernel_size`.
pub fn gaussian(kernel_size: usize, sigma: f32) -> Result<Kernel, ImgprocError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(ImgprocError::InvalidArgument(format!(
            "gaussian sigma must be positive, got {sigma}"
        )));
    }
    Kernel::from_separable(&gaussian_kernel_1d(kernel_size, sigma))
}

/// The fixed kernels, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedKernel {
    /// [`edge_enhance_3x3`]
    Sharpen,
    /// [`box_blur_3x3`]
    Blur,
    /// [`binomial_blur_5x5`]
    Binomial,
}

impl PredefinedKernel {
    /// Build the kernel.
    pub fn kernel(&self) -> Kernel {
        match self {
            PredefinedKernel::Sharpen => edge_enhance_3x3(),
            PredefinedKernel::Blur => box_blur_3x3(),
            PredefinedKernel::Binomial => binomial_blur_5x5(),
        }
    }
}

impl FromStr for PredefinedKernel {
    type Err = ImgprocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sharpen" | "edge_enhance" => Ok(PredefinedKernel::Sharpen),
            "blur" | "box" => Ok(PredefinedKernel::Blur),
            "binomial" | "blur5" => Ok(PredefinedKernel::Binomial),
            _ => Err(ImgprocError::InvalidArgument(format!(
                "unknown kernel name: {s}"
            ))),
        }
    }
}
