use epi_core::{AgentId, Pos};
use thiserror::Error;

/// Lattice consistency errors.
///
/// Every variant is an internal-consistency breach: the engine must abort
/// rather than swallow it, since a corrupted occupancy index invalidates all
/// neighbor queries from that point on.  "No empty cell to move to" is *not*
/// an error — movement simply does not happen.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell {0} is already occupied")]
    CellOccupied(Pos),

    #[error("cell {0} is empty")]
    CellEmpty(Pos),

    #[error("cell {pos} holds {found}, expected {expected}")]
    AgentMismatch {
        pos:      Pos,
        expected: AgentId,
        found:    AgentId,
    },
}

pub type GridResult<T> = Result<T, GridError>;
