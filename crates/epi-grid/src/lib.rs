//! `epi-grid` — toroidal occupancy lattice for the rust_epi automaton.
//!
//! The grid maps each cell of a width × height torus to at most one
//! [`AgentId`](epi_core::AgentId) and maintains the pool of open cells.
//! Occupied cells and the open pool partition the lattice exactly; every
//! mutation goes through [`Grid::place`] / [`Grid::clear`] /
//! [`Grid::relocate`], which keep that partition intact atomically.
//!
//! The grid never owns agent data — only id back-references.  The agent
//! registry lives in `epi-sim`.

pub mod error;
pub mod grid;


pub use error::{GridError, GridResult};
pub use grid::{CellView, Grid};

// Re-exported for caller convenience: most grid call sites also need `Pos`.
pub use epi_core::Pos;
