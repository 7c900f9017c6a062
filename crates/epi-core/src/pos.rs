//! Lattice cell coordinates.

use std::fmt;

/// A lattice cell coordinate, `0 ≤ x < width`, `0 ≤ y < height`.
///
/// Wrapping (toroidal) arithmetic lives on `epi_grid::Grid`, which knows the
/// lattice dimensions; a `Pos` by itself is always already wrapped.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub x: u32,
    pub y: u32,
}

impl Pos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
