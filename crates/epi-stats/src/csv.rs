//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `day_counts.csv` — one row per (day, category), long format.
//! - `r0_bins.csv` — one row per reproduction-number bin boundary.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use epi_core::Day;

use crate::row::{BinAverages, DayCounts};
use crate::StatsResult;

/// Writes per-day counts and reproduction-number bins to two CSV files.
pub struct StatsCsvWriter {
    day_counts: Writer<File>,
    r0_bins:    Writer<File>,
    finished:   bool,
}

impl StatsCsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> StatsResult<Self> {
        let mut day_counts = Writer::from_path(dir.join("day_counts.csv"))?;
        day_counts
            .write_record(["day", "category", "total", "distancing", "masked", "both", "neither"])?;

        let mut r0_bins = Writer::from_path(dir.join("r0_bins.csv"))?;
        r0_bins.write_record([
            "day",
            "overall",
            "distancing",
            "not_distancing",
            "masked",
            "unmasked",
        ])?;

        Ok(Self { day_counts, r0_bins, finished: false })
    }

    /// Write one row per category for `day`.
    pub fn write_day(&mut self, day: Day, counts: &DayCounts) -> StatsResult<()> {
        for (category, c) in counts.categories() {
            self.day_counts.write_record(&[
                day.0.to_string(),
                category.to_string(),
                c.total.to_string(),
                c.distancing.to_string(),
                c.masked.to_string(),
                c.both.to_string(),
                c.neither.to_string(),
            ])?;
        }
        Ok(())
    }

    /// Write one bin-boundary row.  Slots without a value yet are written
    /// as empty fields.
    pub fn write_bin(&mut self, day: Day, bin: &BinAverages) -> StatsResult<()> {
        let fmt = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_default();
        self.r0_bins.write_record(&[
            day.0.to_string(),
            fmt(bin.overall),
            fmt(bin.distancing),
            fmt(bin.not_distancing),
            fmt(bin.masked),
            fmt(bin.unmasked),
        ])?;
        Ok(())
    }

    /// Flush both files.  Safe to call more than once.
    pub fn finish(&mut self) -> StatsResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.day_counts.flush()?;
        self.r0_bins.flush()?;
        Ok(())
    }
}
