//! The statistics collaborator seam.

use epi_core::Day;

use crate::person::{InfectiousDays, Person};

/// Callbacks through which the simulation feeds the statistics collaborator.
///
/// All methods have default no-op implementations; implementors override what
/// they aggregate.  Every argument is read-only — the collaborator must never
/// mutate simulation state.
///
/// # Call contract
///
/// - [`record_initial_susceptible`](Self::record_initial_susceptible) —
///   once per agent at creation, if not initially infected.
/// - [`record_new_infection`](Self::record_new_infection) — once per
///   successful transmission.
/// - [`record_snapshot`](Self::record_snapshot) — once per live agent per
///   day, after the day's updates.
/// - [`record_death`](Self::record_death) /
///   [`record_recovery`](Self::record_recovery) — on terminal transitions.
/// - [`end_of_day`](Self::end_of_day) — once per day boundary;
///   `is_final` is true on the run's last day (scheduled or early-stopped),
///   letting the collaborator emit end-of-run reports.
pub trait Reporter {
    fn record_initial_susceptible(&mut self) {}

    fn record_new_infection(&mut self) {}

    fn record_snapshot(&mut self, _person: &Person) {}

    fn record_death(&mut self, _person: &Person) {}

    fn record_recovery(&mut self, _onward_infections: u32, _infectious_days: &InfectiousDays) {}

    fn end_of_day(&mut self, _day: Day, _is_final: bool) {}
}

/// A [`Reporter`] that does nothing.  Use when running without statistics.
pub struct NoopReporter;

impl Reporter for NoopReporter {}
