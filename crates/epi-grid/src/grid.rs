//! The occupancy grid.
//!
//! # Representation
//!
//! - `cells`: dense row-major `Vec<Option<AgentId>>`, one slot per cell.
//! - `open`: the pool of currently empty cells, kept for O(1) uniform
//!   sampling of a spawn position.
//! - `open_slot`: per-cell index into `open` (`u32::MAX` when occupied),
//!   so removing a cell from the pool is an O(1) swap-remove.
//!
//! All coordinate arithmetic wraps (toroidal topology): a window query at a
//! corner returns cells from the opposite edges.

use epi_core::{AgentId, Pos, SimRng};

use crate::{GridError, GridResult};

const NO_SLOT: u32 = u32::MAX;

// ── CellView ──────────────────────────────────────────────────────────────────

/// One cell of a window query: its wrapped absolute position, its offset
/// relative to the window center, and its occupant (if any).
#[derive(Copy, Clone, Debug)]
pub struct CellView {
    pub pos:      Pos,
    pub rel:      (i32, i32),
    pub occupant: Option<AgentId>,
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// The toroidal width × height occupancy lattice.
pub struct Grid {
    width:     u32,
    height:    u32,
    cells:     Vec<Option<AgentId>>,
    open:      Vec<Pos>,
    open_slot: Vec<u32>,
}

impl Grid {
    /// Create a fully open grid.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        let count = width as usize * height as usize;
        let mut open = Vec::with_capacity(count);
        let mut open_slot = vec![NO_SLOT; count];
        for y in 0..height {
            for x in 0..width {
                open_slot[y as usize * width as usize + x as usize] = open.len() as u32;
                open.push(Pos::new(x, y));
            }
        }
        Self { width, height, cells: vec![None; count], open, open_slot }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of currently empty cells.
    #[inline]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Number of currently occupied cells.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.open.len()
    }

    #[inline]
    fn idx(&self, pos: Pos) -> usize {
        debug_assert!(pos.x < self.width && pos.y < self.height, "unwrapped position {pos}");
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Wrap arbitrary signed coordinates onto the torus.
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> Pos {
        Pos {
            x: x.rem_euclid(self.width as i64) as u32,
            y: y.rem_euclid(self.height as i64) as u32,
        }
    }

    /// The occupant of `pos`, if any.
    #[inline]
    pub fn occupant(&self, pos: Pos) -> Option<AgentId> {
        self.cells[self.idx(pos)]
    }

    #[inline]
    pub fn is_open(&self, pos: Pos) -> bool {
        self.cells[self.idx(pos)].is_none()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Put `agent` on the empty cell `pos`, removing it from the open pool.
    pub fn place(&mut self, agent: AgentId, pos: Pos) -> GridResult<()> {
        let i = self.idx(pos);
        if self.cells[i].is_some() {
            return Err(GridError::CellOccupied(pos));
        }
        self.cells[i] = Some(agent);
        self.remove_open(i);
        Ok(())
    }

    /// Empty the cell `pos`, returning it to the open pool.
    pub fn clear(&mut self, pos: Pos) -> GridResult<AgentId> {
        let i = self.idx(pos);
        let agent = self.cells[i].take().ok_or(GridError::CellEmpty(pos))?;
        self.push_open(i, pos);
        Ok(agent)
    }

    /// Move `agent` from `from` to the empty cell `to`.
    ///
    /// Clear-then-place with both cells verified up front, so a failed move
    /// never leaves the grid half-updated.
    pub fn relocate(&mut self, agent: AgentId, from: Pos, to: Pos) -> GridResult<()> {
        match self.occupant(from) {
            None => return Err(GridError::CellEmpty(from)),
            Some(found) if found != agent => {
                return Err(GridError::AgentMismatch { pos: from, expected: agent, found });
            }
            Some(_) => {}
        }
        if !self.is_open(to) {
            return Err(GridError::CellOccupied(to));
        }
        let from_i = self.idx(from);
        let to_i = self.idx(to);
        self.cells[from_i] = None;
        self.push_open(from_i, from);
        self.cells[to_i] = Some(agent);
        self.remove_open(to_i);
        Ok(())
    }

    /// A uniformly chosen open cell, or `None` if the grid is full.
    pub fn random_open(&self, rng: &mut SimRng) -> Option<Pos> {
        rng.choose(&self.open).copied()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Scan the `side × side` window centered on `center` (window center
    /// included, `rel == (0, 0)`).  `side` must be odd.  Positions wrap.
    pub fn window(&self, center: Pos, side: u32) -> impl Iterator<Item = CellView> + '_ {
        debug_assert!(side % 2 == 1, "window side must be odd");
        let half = (side / 2) as i64;
        let (cx, cy) = (center.x as i64, center.y as i64);
        (-half..=half).flat_map(move |dy| {
            (-half..=half).map(move |dx| {
                let pos = self.wrap(cx + dx, cy + dy);
                CellView {
                    pos,
                    rel: (dx as i32, dy as i32),
                    occupant: self.occupant(pos),
                }
            })
        })
    }

    /// All occupied cells with their occupants, in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, AgentId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, slot)| {
            slot.map(|agent| (Pos::new(i as u32 % self.width, i as u32 / self.width), agent))
        })
    }

    // ── Open-pool bookkeeping ─────────────────────────────────────────────

    fn push_open(&mut self, cell_index: usize, pos: Pos) {
        debug_assert_eq!(self.open_slot[cell_index], NO_SLOT);
        self.open_slot[cell_index] = self.open.len() as u32;
        self.open.push(pos);
    }

    fn remove_open(&mut self, cell_index: usize) {
        let slot = self.open_slot[cell_index];
        debug_assert_ne!(slot, NO_SLOT, "cell missing from open pool");
        self.open_slot[cell_index] = NO_SLOT;
        self.open.swap_remove(slot as usize);
        // The swapped-in tail element (if any) changed slots.
        if let Some(moved) = self.open.get(slot as usize) {
            let moved_i = moved.y as usize * self.width as usize + moved.x as usize;
            self.open_slot[moved_i] = slot;
        }
    }
}
