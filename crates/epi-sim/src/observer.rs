//! Simulation observer trait for progress reporting and rendering.

use epi_agent::HealthStatus;
use epi_core::{AgentId, Day, Pos};

/// Everything a renderer needs to draw one agent: where it is and which
/// visual class it belongs to.  A plain value snapshot — observers never see
/// (and can never mutate) live simulation state.
#[derive(Copy, Clone, Debug)]
pub struct AgentMarker {
    pub id:         AgentId,
    pub pos:        Pos,
    pub status:     HealthStatus,
    pub distancing: bool,
    pub masked:     bool,
}

/// Callbacks invoked by [`CellularAutomaton::run`][crate::CellularAutomaton::run]
/// at key points in the day loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u32 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, day: Day, infected: usize) {
///         if day.0 % self.interval == 0 {
///             println!("{day}: {infected} infected");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any agent is updated.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called once per live agent after the day's updates, with its
    /// end-of-day marker state.
    fn on_agent(&mut self, _marker: &AgentMarker) {}

    /// Called at the end of each day.  `infected` is the number of agents
    /// still infected after the day's updates.
    fn on_day_end(&mut self, _day: Day, _infected: usize) {}

    /// Called once after the final day completes (scheduled or
    /// early-stopped).
    fn on_sim_end(&mut self, _final_day: Day) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
