//! Run configuration.
//!
//! The whole parameter surface of a run is one [`EpiConfig`] bundle, passed
//! opaquely to the engine — the core never hardcodes probabilities or grid
//! dimensions.  Applications typically deserialize it from a JSON/TOML file
//! (enable the `serde` feature) and call [`EpiConfig::validate`] before
//! handing it to the engine.

use crate::{EpiError, EpiResult, SimRng};

// ── DurationRange ─────────────────────────────────────────────────────────────

/// An inclusive integer range sampled uniformly, used for disease timing
/// durations and ages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draw uniformly from `[min, max]`, both ends inclusive.
    #[inline]
    pub fn sample(&self, rng: &mut SimRng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, what: &str) -> EpiResult<()> {
        if self.min > self.max {
            return Err(EpiError::Config(format!(
                "{what}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ── Section structs ───────────────────────────────────────────────────────────

/// Lattice dimensions and initial population size.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub width:      u32,
    pub height:     u32,
    /// Number of agents created at simulation start.  Must not exceed
    /// `width * height`.
    pub population: u32,
}

/// Probabilities that a freshly created agent adopts each protective
/// behavior.  The three draws are independent: some agents distance and
/// mask, some do one or the other, some neither.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyConfig {
    pub social_distance_prob: f64,
    pub wear_mask_prob:       f64,
    pub low_movement_prob:    f64,
}

impl PolicyConfig {
    /// High-compliance preset: 75% adoption of each behavior.
    pub const HIGH: PolicyConfig = PolicyConfig {
        social_distance_prob: 0.75,
        wear_mask_prob:       0.75,
        low_movement_prob:    0.75,
    };

    /// Medium-compliance preset: 50% adoption of each behavior.
    pub const MEDIUM: PolicyConfig = PolicyConfig {
        social_distance_prob: 0.5,
        wear_mask_prob:       0.5,
        low_movement_prob:    0.5,
    };

    /// Low-compliance preset: 25% adoption of each behavior.
    pub const LOW: PolicyConfig = PolicyConfig {
        social_distance_prob: 0.25,
        wear_mask_prob:       0.25,
        low_movement_prob:    0.25,
    };
}

/// Per-step movement behavior.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementConfig {
    /// Per-day probability of an intentional move for low-movement agents.
    pub low_prob:    f64,
    /// Per-day probability of an intentional move for high-movement agents.
    pub high_prob:   f64,
    /// Maximum relocation sub-steps per intentional move.
    pub move_length: u32,
}

/// Transmission probabilities and disease-course timing.
///
/// All probability constants are illustrative parameters, not calibrated
/// clinical inputs.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiseaseConfig {
    /// Per-neighbor, per-day probability that an adjacent infectious agent
    /// infects a susceptible one.
    pub base_infection_prob:          f64,
    /// Subtracted from `base_infection_prob` when the infectious neighbor
    /// wears a mask.
    pub mask_infection_prob_decrease: f64,
    /// Probability that a freshly created agent starts out infected.
    pub initial_infection_prob:       f64,
    /// Probability that an infected agent never develops symptoms.
    pub asymptomatic_prob:            f64,
    /// Probability of severe symptoms, given symptoms.
    pub severe_prob:                  f64,
    /// Probability of death, given severe symptoms.
    pub death_prob:                   f64,

    /// Total infection length in days; the recover day for every
    /// non-fatal course.
    pub total_length:                           u32,
    pub incubation_range:                       DurationRange,
    /// Days before symptom onset at which infectiousness begins.
    pub infectious_start_before_symptoms_range: DurationRange,
    pub infectious_duration_range:              DurationRange,
    /// Days after symptom onset at which severe symptoms begin.
    pub severe_onset_range:                     DurationRange,
    /// Days after severe onset at which death occurs.
    pub death_onset_range:                      DurationRange,
}

// ── EpiConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration: every named numeric/range parameter of the
/// simulation in one structured bundle.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpiConfig {
    pub grid:     GridConfig,
    pub policy:   PolicyConfig,
    pub movement: MovementConfig,
    pub disease:  DiseaseConfig,

    /// Probability, drawn once per agent at creation, that the agent reacts
    /// to its own mild symptoms by masking/distancing/slowing down.
    pub altruistic_prob: f64,
    pub age_range:       DurationRange,

    /// Number of simulated days.
    pub days: u32,
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl EpiConfig {
    /// Check every structural invariant that can be checked before sampling.
    ///
    /// Range checks here are worst-case: a configuration is rejected when
    /// any possible draw would violate a schedule invariant (the latent
    /// period check below), even if most draws would pass.  Per-sample
    /// violations inside an accepted range are still caught at agent
    /// creation.
    pub fn validate(&self) -> EpiResult<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(EpiError::Config("grid dimensions must be non-zero".into()));
        }
        let cells = self.grid.width as u64 * self.grid.height as u64;
        if self.grid.population as u64 > cells {
            return Err(EpiError::Config(format!(
                "population {} exceeds {} grid cells",
                self.grid.population, cells
            )));
        }
        if self.movement.move_length == 0 {
            return Err(EpiError::Config("move_length must be at least 1".into()));
        }
        if self.days == 0 {
            return Err(EpiError::Config("days must be at least 1".into()));
        }
        if self.disease.total_length == 0 {
            return Err(EpiError::Config("total_length must be at least 1".into()));
        }

        for (p, what) in [
            (self.policy.social_distance_prob, "social_distance_prob"),
            (self.policy.wear_mask_prob, "wear_mask_prob"),
            (self.policy.low_movement_prob, "low_movement_prob"),
            (self.movement.low_prob, "movement low_prob"),
            (self.movement.high_prob, "movement high_prob"),
            (self.disease.base_infection_prob, "base_infection_prob"),
            (self.disease.mask_infection_prob_decrease, "mask_infection_prob_decrease"),
            (self.disease.initial_infection_prob, "initial_infection_prob"),
            (self.disease.asymptomatic_prob, "asymptomatic_prob"),
            (self.disease.severe_prob, "severe_prob"),
            (self.disease.death_prob, "death_prob"),
            (self.altruistic_prob, "altruistic_prob"),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EpiError::Config(format!("{what} {p} outside [0, 1]")));
            }
        }

        self.age_range.validate("age_range")?;
        self.disease.incubation_range.validate("incubation_range")?;
        self.disease
            .infectious_start_before_symptoms_range
            .validate("infectious_start_before_symptoms_range")?;
        self.disease
            .infectious_duration_range
            .validate("infectious_duration_range")?;
        self.disease.severe_onset_range.validate("severe_onset_range")?;
        self.disease.death_onset_range.validate("death_onset_range")?;

        // Worst-case draws must still leave a latent period of at least one day.
        if self.disease.incubation_range.min
            <= self.disease.infectious_start_before_symptoms_range.max
        {
            return Err(EpiError::Config(
                "incubation_range.min must exceed infectious_start_before_symptoms_range.max \
                 (latent period is always at least one day)"
                    .into(),
            ));
        }

        Ok(())
    }
}
