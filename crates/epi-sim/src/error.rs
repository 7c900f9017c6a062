use epi_core::EpiError;
use epi_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration or schedule error: {0}")]
    Core(#[from] EpiError),

    #[error("grid invariant breach: {0}")]
    Grid(#[from] GridError),
}

pub type SimResult<T> = Result<T, SimError>;
