//! The `Person` — one agent's behavior flags and disease state.
//!
//! A person owns its position, its two phase schedules, and its behavior
//! flags (distancing / masking / movement probability) together with their
//! pre-infection baselines.  Spatial interaction is the engine's job: the
//! person only receives the mask flags of its infectious neighbors when
//! checking exposure, and reports group-membership changes back through
//! [`DayOutcome`] for the engine to reconcile at day end.

use epi_core::{AgentId, EpiConfig, EpiResult, Pos, SimRng};

use crate::reporter::Reporter;
use crate::schedule::{DiseaseCourse, InfectionPhase, PhaseSchedule, SymptomPhase};

// ── HealthStatus ──────────────────────────────────────────────────────────────

/// Aggregate health status.  A single enum rather than three booleans, so
/// "exactly one of susceptible/infected/recovered" holds by construction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HealthStatus {
    Susceptible,
    Infected,
    Recovered,
}

// ── InfectiousDays ────────────────────────────────────────────────────────────

/// Days spent in the infectious phase, broken down by the behavior flags
/// that were active on each of those days.  Consumed by the statistics
/// collaborator for behavior-stratified reproduction-number estimates.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct InfectiousDays {
    pub distancing:     u32,
    pub not_distancing: u32,
    pub masked:         u32,
    pub unmasked:       u32,
}

impl InfectiousDays {
    fn tally(&mut self, distancing: bool, masked: bool) {
        if distancing {
            self.distancing += 1;
        } else {
            self.not_distancing += 1;
        }
        if masked {
            self.masked += 1;
        } else {
            self.unmasked += 1;
        }
    }

    /// Did the agent distance on more infectious days than not?
    pub fn majority_distancing(&self) -> bool {
        self.distancing > self.not_distancing
    }

    /// Did the agent mask on more infectious days than not?
    pub fn majority_masked(&self) -> bool {
        self.masked > self.unmasked
    }
}

// ── DayOutcome ────────────────────────────────────────────────────────────────

/// Result of one day of disease progression.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct DayOutcome {
    /// The symptom schedule reached `death`; the engine must remove the
    /// agent from the grid and registry.
    pub died: bool,
    /// `Some(true)` — the agent started distancing today; `Some(false)` —
    /// it stopped.  The engine moves it between behavior groups at day end,
    /// never mid-scan.
    pub distancing_change: Option<bool>,
}

// ── Person ────────────────────────────────────────────────────────────────────

/// One agent.
pub struct Person {
    pub id:       AgentId,
    pub age:      u32,
    pub position: Pos,

    pub social_distancing: bool,
    pub wears_mask:        bool,
    /// Per-day probability of an intentional move.
    pub movement_prob:     f64,
    /// Immutable trait: reacts to its own mild symptoms by masking,
    /// distancing, and slowing down.
    pub altruistic:        bool,

    // Pre-infection baselines, restored on recovery.
    distancing_baseline: bool,
    mask_baseline:       bool,
    movement_baseline:   f64,
    /// The reduced movement probability adopted on altruistic mild symptoms.
    low_movement_prob:   f64,

    status: HealthStatus,
    /// Day counter within the infection: −1 before infection, 0 at the
    /// moment of infection, then +1 per simulated day.
    pub infection_step: i32,
    infection: PhaseSchedule<InfectionPhase>,
    symptoms:  PhaseSchedule<SymptomPhase>,

    /// Susceptible agents this agent's exposure directly infected.
    pub onward_infections: u32,
    pub infectious_days:   InfectiousDays,
}

impl Person {
    /// Sample a fresh person at `position` from the run configuration:
    /// age, behavior flags, movement rate, altruism, initial infection, and
    /// a complete disease course.
    pub fn create(
        id:       AgentId,
        position: Pos,
        cfg:      &EpiConfig,
        rng:      &mut SimRng,
    ) -> EpiResult<Person> {
        let age = cfg.age_range.sample(rng);
        let social_distancing = rng.gen_bool(cfg.policy.social_distance_prob);
        let wears_mask = rng.gen_bool(cfg.policy.wear_mask_prob);
        let movement_prob = if rng.gen_bool(cfg.policy.low_movement_prob) {
            cfg.movement.low_prob
        } else {
            cfg.movement.high_prob
        };
        let altruistic = rng.gen_bool(cfg.altruistic_prob);
        let initially_infected = rng.gen_bool(cfg.disease.initial_infection_prob);
        let course = DiseaseCourse::sample(&cfg.disease, rng)?;

        let mut person = Person {
            id,
            age,
            position,
            social_distancing,
            wears_mask,
            movement_prob,
            altruistic,
            distancing_baseline: social_distancing,
            mask_baseline:       wears_mask,
            movement_baseline:   movement_prob,
            low_movement_prob:   cfg.movement.low_prob,
            status: HealthStatus::Susceptible,
            infection_step: -1,
            infection: course.infection,
            symptoms:  course.symptoms,
            onward_infections: 0,
            infectious_days: InfectiousDays::default(),
        };
        if initially_infected {
            person.begin_infection();
        }
        Ok(person)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn status(&self) -> HealthStatus {
        self.status
    }

    #[inline]
    pub fn is_susceptible(&self) -> bool {
        self.status == HealthStatus::Susceptible
    }

    #[inline]
    pub fn is_infected(&self) -> bool {
        self.status == HealthStatus::Infected
    }

    #[inline]
    pub fn is_recovered(&self) -> bool {
        self.status == HealthStatus::Recovered
    }

    /// Infectious, not merely infected: only during the `infectious` phase
    /// of the infection axis can this agent transmit.
    #[inline]
    pub fn is_infectious(&self) -> bool {
        self.infection.current() == Some(InfectionPhase::Infectious)
    }

    #[inline]
    pub fn infection_phase(&self) -> Option<InfectionPhase> {
        self.infection.current()
    }

    #[inline]
    pub fn symptom_phase(&self) -> Option<SymptomPhase> {
        self.symptoms.current()
    }

    // ── Disease progression ───────────────────────────────────────────────

    /// Advance the disease clock by one simulated day.  No-op unless
    /// infected.
    ///
    /// Checks both axes independently; each enters at most one new phase
    /// per day.  On reaching `death` the returned outcome is terminal — no
    /// further state is mutated and the engine must destroy the agent.
    pub fn advance_one_day<R: Reporter>(&mut self, reporter: &mut R) -> DayOutcome {
        if self.status != HealthStatus::Infected {
            return DayOutcome::default();
        }
        if self.is_infectious() {
            self.infectious_days.tally(self.social_distancing, self.wears_mask);
        }

        self.infection_step += 1;
        let day = self.infection_step as u32;
        let new_infection = self.infection.advance(day);
        let new_symptom = self.symptoms.advance(day);

        if self.symptoms.current() == Some(SymptomPhase::Death) {
            return DayOutcome { died: true, distancing_change: None };
        }

        let mut change = None;
        match new_symptom {
            // Altruists respond to their own mild symptoms.
            Some(SymptomPhase::Mild) if self.altruistic => {
                self.movement_prob = self.low_movement_prob;
                self.wears_mask = true;
                if !self.social_distancing {
                    change = Some(true);
                }
                self.social_distancing = true;
            }
            // Severe symptoms stop intentional movement for everyone.
            Some(SymptomPhase::Severe) => {
                self.movement_prob = 0.0;
                self.wears_mask = true;
                if !self.social_distancing {
                    change = Some(true);
                }
                self.social_distancing = true;
            }
            _ => {}
        }

        if new_infection == Some(InfectionPhase::Recovered) {
            self.status = HealthStatus::Recovered;
            self.wears_mask = self.mask_baseline;
            if self.social_distancing != self.distancing_baseline {
                change = Some(self.distancing_baseline);
            }
            self.social_distancing = self.distancing_baseline;
            self.movement_prob = self.movement_baseline;
            self.symptoms.clear_current();
            reporter.record_recovery(self.onward_infections, &self.infectious_days);
        }

        DayOutcome { died: false, distancing_change: change }
    }

    // ── Transmission ──────────────────────────────────────────────────────

    /// Draw against the compound infection hazard from `neighbor_masks`
    /// (one mask flag per infectious neighbor).  No-op unless susceptible.
    ///
    /// On success the agent becomes infected with its day counter at 0 and
    /// both day-0 phases (latent, incubation) current.  The caller credits
    /// the neighbors' onward-infection counts and notifies the reporter.
    pub fn check_exposure(
        &mut self,
        neighbor_masks: &[bool],
        base_prob:      f64,
        mask_reduction: f64,
        rng:            &mut SimRng,
    ) -> bool {
        if self.status != HealthStatus::Susceptible || neighbor_masks.is_empty() {
            return false;
        }
        let p = infection_probability(base_prob, mask_reduction, neighbor_masks);
        if rng.gen_bool(p) {
            self.begin_infection();
            true
        } else {
            false
        }
    }

    /// Become infected now: day counter to 0, day-0 schedule entries
    /// consumed so latent/incubation are immediately current.
    fn begin_infection(&mut self) {
        self.status = HealthStatus::Infected;
        self.infection_step = 0;
        self.infection.advance(0);
        self.symptoms.advance(0);
        debug_assert_eq!(self.infection.current(), Some(InfectionPhase::Latent));
        debug_assert_eq!(self.symptoms.current(), Some(SymptomPhase::Incubation));
    }
}

// ── Transmission math ─────────────────────────────────────────────────────────

/// Kermack–McKendrick-style compound hazard.
///
/// Per-neighbor probability `pᵢ = base − (maskᵢ ? reduction : 0)`, averaged
/// to `p̄`; with `r` infectious neighbors the infection probability is
/// `1 − (1 − p̄)^r`.  Returns 0 for an empty neighbor set.
pub fn infection_probability(base: f64, mask_reduction: f64, neighbor_masks: &[bool]) -> f64 {
    if neighbor_masks.is_empty() {
        return 0.0;
    }
    let sum: f64 = neighbor_masks
        .iter()
        .map(|&masked| base - if masked { mask_reduction } else { 0.0 })
        .sum();
    let mean = (sum / neighbor_masks.len() as f64).clamp(0.0, 1.0);
    1.0 - (1.0 - mean).powi(neighbor_masks.len() as i32)
}
