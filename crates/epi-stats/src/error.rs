//! Error types for epi-stats.

use thiserror::Error;

/// Errors that can occur when writing statistics output.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, StatsError>`.
pub type StatsResult<T> = Result<T, StatsError>;
