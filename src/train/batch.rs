//! Contiguous, wrapping mini-batch schedule.

use crate::error::{NnError, Result};

/// A batch must hold at least one row and no more rows than the dataset.
pub fn validate(batch_size: usize, rows: usize) -> Result<()> {
    if batch_size == 0 || batch_size > rows {
        return Err(NnError::InvalidBatch { batch_size, rows });
    }
    Ok(())
}

/// First row of the batch used at `iteration`: `(batch_size * iteration) mod rows`.
pub fn start_row(iteration: usize, batch_size: usize, rows: usize) -> usize {
    ((batch_size % rows) * (iteration % rows)) % rows
}
