//! `epi-stats` — the statistics collaborator for the rust_epi automaton.
//!
//! [`DataCollector`] implements `epi_agent::Reporter` and aggregates, per
//! day, the population counts the engine reports; it derives a binned
//! reproduction-number estimate and the secondary attack rate, prints
//! human-readable day summaries at a configurable frequency, and can write
//! everything through [`StatsCsvWriter`] to two CSV files
//! (`day_counts.csv`, `r0_bins.csv`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use epi_stats::{DataCollector, StatsCsvWriter};
//!
//! let writer = StatsCsvWriter::new(Path::new("./output"))?;
//! let collector = DataCollector::new().with_print_frequency(5).with_csv(writer);
//! let mut automaton = CellularAutomaton::new(config, collector)?;
//! automaton.run(&mut NoopObserver)?;
//! if let Some(e) = automaton.reporter.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod collector;
pub mod csv;
pub mod error;
pub mod row;

#[cfg(test)]
mod tests;

pub use collector::DataCollector;
pub use csv::StatsCsvWriter;
pub use error::{StatsError, StatsResult};
pub use row::{BinAverages, DayCounts, LifetimeRecord, StageCounts};
