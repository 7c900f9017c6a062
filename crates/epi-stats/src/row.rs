//! Plain aggregate record types.
//!
//! Every tracked category and behavior split is a named field, fixed at
//! compile time.

/// Behavior breakdown of one tracked category on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub total:      u32,
    pub distancing: u32,
    pub masked:     u32,
    /// Distancing and masked.
    pub both:       u32,
    /// Neither distancing nor masked.
    pub neither:    u32,
}

impl StageCounts {
    pub(crate) fn tally(&mut self, distancing: bool, masked: bool) {
        self.total += 1;
        if distancing {
            self.distancing += 1;
        }
        if masked {
            self.masked += 1;
        }
        if distancing && masked {
            self.both += 1;
        }
        if !distancing && !masked {
            self.neither += 1;
        }
    }
}

/// All tracked categories for one day.
///
/// The three health statuses partition the live population; `mild`,
/// `severe`, and `asymptomatic` are the subsets of `infected` currently in
/// that symptom phase; `deaths` counts agents destroyed *on* this day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub susceptible:  StageCounts,
    pub infected:     StageCounts,
    pub recovered:    StageCounts,
    pub mild:         StageCounts,
    pub severe:       StageCounts,
    pub asymptomatic: StageCounts,
    pub deaths:       StageCounts,
}

impl DayCounts {
    /// `(name, counts)` pairs in the canonical output order.
    pub fn categories(&self) -> [(&'static str, StageCounts); 7] {
        [
            ("susceptible", self.susceptible),
            ("infected", self.infected),
            ("recovered", self.recovered),
            ("mild", self.mild),
            ("severe", self.severe),
            ("asymptomatic", self.asymptomatic),
            ("deaths", self.deaths),
        ]
    }
}

/// One completed infection lifetime, recorded when an agent recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeRecord {
    /// Susceptible agents this agent directly infected.
    pub onward: u32,
    /// Distanced on more infectious days than not.
    pub majority_distancing: bool,
    /// Masked on more infectious days than not.
    pub majority_masked: bool,
}

/// Mean onward-infection counts for one reproduction-number bin, overall
/// and split by infectious-phase behavior.
///
/// A slot is `None` until the first bin produces a value for it; after
/// that, empty bins carry the previous bin's average forward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinAverages {
    pub overall:        Option<f64>,
    pub distancing:     Option<f64>,
    pub not_distancing: Option<f64>,
    pub masked:         Option<f64>,
    pub unmasked:       Option<f64>,
}
