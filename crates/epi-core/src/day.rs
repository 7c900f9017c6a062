//! Simulation time model.
//!
//! Time advances in whole simulated days.  Using an integer day counter as
//! the canonical unit keeps all schedule arithmetic exact and comparisons
//! O(1); there is no sub-day resolution anywhere in the automaton.

use std::fmt;

/// An absolute simulated-day counter, starting at 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub u32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Return the day `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Day {
        Day(self.0 + n)
    }

    /// Days elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Day) -> u32 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: u32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Day) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}
