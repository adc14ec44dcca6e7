use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use quadwarp_image::{Image, ImageError};

/// Controls how per-pixel operations are executed.
///
/// Every strategy evaluates each pixel with the same arithmetic, so the
/// output does not depend on the strategy chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to each destination pixel for resampling.
///
/// The closure receives the pixel column, the pixel row and the mutable
/// channel slice of that pixel.
///
/// # Errors
///
/// Fails if a [`ExecutionStrategy::Fixed`] pool cannot be built or asks for zero threads.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) -> Result<(), ImageError>
where
    T: Send,
{
    let cols = dst.cols();
    if cols == 0 || C == 0 {
        return Ok(());
    }

    let row_stride = C * cols;
    let process_row = |(y, row): (usize, &mut [T])| {
        row.chunks_exact_mut(C)
            .enumerate()
            .for_each(|(x, pixel)| f(x, y, pixel));
    };

    match strategy {
        ExecutionStrategy::Serial => {
            dst.as_slice_mut()
                .chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(process_row);
        }
        ExecutionStrategy::ParallelRows => {
            dst.as_slice_mut()
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(process_row);
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ImageError::ParallelError(
                    "thread count must be > 0".to_string(),
                ));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ImageError::ParallelError(e.to_string()))?;

            let data = dst.as_slice_mut();
            pool.install(|| {
                data.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(process_row);
            });
        }
    }

    Ok(())
}
