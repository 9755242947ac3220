use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rayon::prelude::*;
use thiserror::Error;

use imfilt_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be non-zero.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),
}

/// Controls how row-partitioned operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool and process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// A shared flag used to stop a long running operation between rows.
///
/// Clones share the same flag, so a token can be handed to another thread
/// (e.g. a signal handler) and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`CancellationToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel of the image in place, in parallel by rows.
pub fn par_iter_rows_mut<T, const C: usize>(
    image: &mut Image<T, C>,
    f: impl Fn(&mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = image.cols();
    if cols == 0 {
        return;
    }
    image
        .as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .for_each(|row| row.chunks_exact_mut(C).for_each(&f));
}

/// Run a fallible operation over every row of `dst` with the given strategy.
///
/// The closure receives the row index and the mutable row slice. The first
/// error stops the scheduling of further rows and is returned to the caller.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, split into rows of `row_stride` elements.
/// * `row_stride` - The number of elements in a row (width * channels).
/// * `op` - The operation to perform on each row.
pub fn execute_rows<T, E, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_stride: usize,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: Send + From<ParallelError>,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Sync + Send,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride).into());
    }

    match strategy {
        ExecutionStrategy::Serial => dst
            .chunks_exact_mut(row_stride)
            .enumerate()
            .try_for_each(|(y, row)| op(y, row)),
        ExecutionStrategy::ParallelRows => dst
            .par_chunks_exact_mut(row_stride)
            .enumerate()
            .try_for_each(|(y, row)| op(y, row)),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .try_for_each(|(y, row)| op(y, row))
            })
        }
    }
}
