//! `epi-sim` — day loop engine for the rust_epi automaton.
//!
//! # Two-phase day loop
//!
//! ```text
//! for day in 1..=config.days:
//!   ① Non-distancing pass — each agent in the not-distancing set, in a
//!                           fresh random order: advance disease → destroy
//!                           if dead → exposure check → free movement.
//!   ② Distancing pass     — same for the distancing set, with the
//!                           safe-cell movement policy; processed last so
//!                           it sees the day's final occupancy.
//!   ③ Reconcile           — apply deferred behavior-group changes.
//!   ④ Report              — per-agent snapshots, then the day boundary
//!                           (final when scheduled days are up or no
//!                           infected agent remains).
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_agent::NoopReporter;
//! use epi_sim::{CellularAutomaton, NoopObserver};
//!
//! let mut automaton = CellularAutomaton::new(config, NoopReporter)?;
//! let last_day = automaton.run(&mut NoopObserver)?;
//! ```

pub mod automaton;
pub mod error;
pub mod observer;


pub use automaton::CellularAutomaton;
pub use error::{SimError, SimResult};
pub use observer::{AgentMarker, NoopObserver, SimObserver};
