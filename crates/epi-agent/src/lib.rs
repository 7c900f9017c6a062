//! `epi-agent` — the per-agent disease model for the rust_epi automaton.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`schedule`] | `InfectionPhase`/`SymptomPhase`, `PhaseSchedule`, `DiseaseCourse` |
//! | [`person`]   | `Person` — position, behavior flags, disease progression      |
//! | [`reporter`] | `Reporter` trait — the statistics collaborator seam           |
//!
//! # Design notes
//!
//! Each agent carries two phase schedules sampled once at creation: the
//! infection axis (latent → infectious → removed → recovered) and the
//! symptom axis (incubation → {asymptomatic | mild [→ severe]} →
//! {recovered | death}).  Both axes share one day counter and advance by at
//! most one phase per simulated day.  Schedules are immutable after
//! sampling; progression moves a cursor, never mutates the entry list.
//!
//! The engine in `epi-sim` owns all spatial interaction (neighbor scans,
//! movement); this crate only sees the *result* of a scan — the mask flags
//! of the infectious neighbors — when checking exposure.

pub mod person;
pub mod reporter;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use person::{DayOutcome, HealthStatus, InfectiousDays, Person, infection_probability};
pub use reporter::{NoopReporter, Reporter};
pub use schedule::{DiseaseCourse, InfectionPhase, PhaseSchedule, SymptomPhase};
