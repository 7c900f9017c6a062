//! The `DataCollector` — aggregates per-day counts, reproduction-number
//! bins, and the secondary attack rate from reporter callbacks.

use epi_agent::{HealthStatus, InfectiousDays, Person, Reporter, SymptomPhase};
use epi_core::Day;

use crate::csv::StatsCsvWriter;
use crate::row::{BinAverages, DayCounts, LifetimeRecord};
use crate::StatsError;

/// Aggregates simulation statistics and optionally writes them to CSV.
///
/// Implements [`Reporter`], so it plugs directly into the engine.  Reporter
/// methods have no return value, so write errors are stored internally;
/// after the run returns, check for them with
/// [`take_error`](Self::take_error).
///
/// Tracked aggregates:
/// - per-day [`DayCounts`] with the full run history;
/// - completed infection lifetimes, averaged into fixed-width day bins for
///   reproduction-number estimation (empty slots carry the previous bin's
///   average forward);
/// - the secondary attack rate, total transmissions over the initially
///   susceptible population.
pub struct DataCollector {
    /// Width of a reproduction-number bin, in days.
    bin_size:        u32,
    /// Print a day summary every this many days; 0 silences printing.
    print_frequency: u32,

    total_infected:      u32,
    initial_susceptible: u32,

    current: DayCounts,
    history: Vec<(Day, DayCounts)>,

    current_bin:  Vec<LifetimeRecord>,
    bin_averages: Vec<(Day, BinAverages)>,
    last_bin:     BinAverages,

    writer:     Option<StatsCsvWriter>,
    last_error: Option<StatsError>,
}

impl Default for DataCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCollector {
    pub fn new() -> Self {
        Self {
            bin_size:            5,
            print_frequency:     1,
            total_infected:      0,
            initial_susceptible: 0,
            current:             DayCounts::default(),
            history:             Vec::new(),
            current_bin:         Vec::new(),
            bin_averages:        Vec::new(),
            last_bin:            BinAverages::default(),
            writer:              None,
            last_error:          None,
        }
    }

    /// Set the reproduction-number bin width (minimum 1 day).
    pub fn with_bin_size(mut self, days: u32) -> Self {
        self.bin_size = days.max(1);
        self
    }

    /// Set how often a day summary is printed; 0 disables printing.
    pub fn with_print_frequency(mut self, days: u32) -> Self {
        self.print_frequency = days;
        self
    }

    /// Attach a CSV backend.  Rows are written at every day boundary and
    /// flushed on the final day.
    pub fn with_csv(mut self, writer: StatsCsvWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    // ── Results ───────────────────────────────────────────────────────────

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<StatsError> {
        self.last_error.take()
    }

    /// Per-day counts, one entry per completed day.
    pub fn history(&self) -> &[(Day, DayCounts)] {
        &self.history
    }

    /// Bin averages, one entry per completed bin boundary.
    pub fn bin_averages(&self) -> &[(Day, BinAverages)] {
        &self.bin_averages
    }

    pub fn total_infected(&self) -> u32 {
        self.total_infected
    }

    pub fn initial_susceptible(&self) -> u32 {
        self.initial_susceptible
    }

    /// Total transmissions over the initially susceptible population, or
    /// `None` when nobody started susceptible.
    pub fn secondary_attack_rate(&self) -> Option<f64> {
        (self.initial_susceptible > 0)
            .then(|| f64::from(self.total_infected) / f64::from(self.initial_susceptible))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn store_err(&mut self, result: Result<(), StatsError>) {
        // Keep only the first error.
        if let Err(e) = result
            && self.last_error.is_none()
        {
            self.last_error = Some(e);
        }
    }

    /// Average the completed lifetimes of the current bin into each slot,
    /// carrying the previous bin's value where this bin has no data.
    fn close_bin(&mut self, day: Day) -> BinAverages {
        let records = self.current_bin.as_slice();
        let bin = BinAverages {
            overall:        average(records, |_| true).or(self.last_bin.overall),
            distancing:     average(records, |r| r.majority_distancing)
                .or(self.last_bin.distancing),
            not_distancing: average(records, |r| !r.majority_distancing)
                .or(self.last_bin.not_distancing),
            masked:         average(records, |r| r.majority_masked).or(self.last_bin.masked),
            unmasked:       average(records, |r| !r.majority_masked).or(self.last_bin.unmasked),
        };
        self.last_bin = bin;
        self.bin_averages.push((day, bin));
        self.current_bin.clear();
        bin
    }

    fn print_summary(&self, day: Day, closed_bin: Option<BinAverages>) {
        let c = &self.current;
        println!(
            "{day} --- S: {} --- I: {} --- R: {} --- mild: {} --- severe: {} --- \
             asymptomatic: {} --- deaths: {}",
            c.susceptible.total,
            c.infected.total,
            c.recovered.total,
            c.mild.total,
            c.severe.total,
            c.asymptomatic.total,
            c.deaths.total,
        );
        if let Some(bin) = closed_bin
            && let Some(r0) = bin.overall
        {
            println!("  basic reproduction number (R0): {r0:.2}");
        }
    }
}

impl Reporter for DataCollector {
    fn record_initial_susceptible(&mut self) {
        self.initial_susceptible += 1;
    }

    fn record_new_infection(&mut self) {
        self.total_infected += 1;
    }

    fn record_snapshot(&mut self, person: &Person) {
        let distancing = person.social_distancing;
        let masked = person.wears_mask;
        match person.status() {
            HealthStatus::Susceptible => self.current.susceptible.tally(distancing, masked),
            HealthStatus::Infected => self.current.infected.tally(distancing, masked),
            HealthStatus::Recovered => self.current.recovered.tally(distancing, masked),
        }
        match person.symptom_phase() {
            Some(SymptomPhase::Mild) => self.current.mild.tally(distancing, masked),
            Some(SymptomPhase::Severe) => self.current.severe.tally(distancing, masked),
            Some(SymptomPhase::Asymptomatic) => {
                self.current.asymptomatic.tally(distancing, masked);
            }
            _ => {}
        }
    }

    fn record_death(&mut self, person: &Person) {
        self.current.deaths.tally(person.social_distancing, person.wears_mask);
    }

    fn record_recovery(&mut self, onward_infections: u32, infectious_days: &InfectiousDays) {
        self.current_bin.push(LifetimeRecord {
            onward:              onward_infections,
            majority_distancing: infectious_days.majority_distancing(),
            majority_masked:     infectious_days.majority_masked(),
        });
    }

    fn end_of_day(&mut self, day: Day, is_final: bool) {
        let counts = self.current;
        self.history.push((day, counts));
        let result = self.writer.as_mut().map(|w| w.write_day(day, &counts));
        if let Some(r) = result {
            self.store_err(r);
        }

        let mut closed_bin = None;
        if day.0 % self.bin_size == 0 {
            let bin = self.close_bin(day);
            let result = self.writer.as_mut().map(|w| w.write_bin(day, &bin));
            if let Some(r) = result {
                self.store_err(r);
            }
            closed_bin = Some(bin);
        }

        if self.print_frequency > 0 && day.0 % self.print_frequency == 0 {
            self.print_summary(day, closed_bin);
        }

        self.current = DayCounts::default();

        if is_final {
            if self.print_frequency > 0
                && let Some(sar) = self.secondary_attack_rate()
            {
                println!(
                    "secondary attack rate (SAR): {} / {} = {sar:.2}",
                    self.total_infected, self.initial_susceptible
                );
            }
            let result = self.writer.as_mut().map(|w| w.finish());
            if let Some(r) = result {
                self.store_err(r);
            }
        }
    }
}

/// Mean onward-infection count over the records matching `keep`, or `None`
/// when none match.
fn average<F: Fn(&LifetimeRecord) -> bool>(records: &[LifetimeRecord], keep: F) -> Option<f64> {
    let mut sum = 0u64;
    let mut n = 0u64;
    for record in records.iter().filter(|r| keep(r)) {
        sum += u64::from(record.onward);
        n += 1;
    }
    (n > 0).then(|| sum as f64 / n as f64)
}
