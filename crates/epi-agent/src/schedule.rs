//! Disease-course sampling and phase schedules.
//!
//! A schedule is an ordered list of `(phase, start_day)` entries with
//! strictly increasing start days, consumed front-to-back by a cursor as the
//! agent's day counter reaches each start day.  Sampling happens exactly
//! once, at agent creation; a schedule that violates an ordering invariant
//! is a fatal error at that point, never a recoverable runtime condition —
//! a malformed course would silently corrupt every downstream statistic.

use std::fmt;

use epi_core::{DiseaseConfig, EpiError, EpiResult, SimRng};

// ── Phases ────────────────────────────────────────────────────────────────────

/// The infection (transmissibility) axis.  `Infectious` is the only phase
/// during which the agent can transmit; "infected" spans all four.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InfectionPhase {
    Latent,
    Infectious,
    Removed,
    Recovered,
}

/// The symptom axis.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SymptomPhase {
    Incubation,
    Asymptomatic,
    Mild,
    Severe,
    Death,
    Recovered,
}

impl fmt::Display for InfectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfectionPhase::Latent     => "latent",
            InfectionPhase::Infectious => "infectious",
            InfectionPhase::Removed    => "removed",
            InfectionPhase::Recovered  => "recovered",
        };
        f.write_str(s)
    }
}

impl fmt::Display for SymptomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymptomPhase::Incubation   => "incubation",
            SymptomPhase::Asymptomatic => "asymptomatic",
            SymptomPhase::Mild         => "mild",
            SymptomPhase::Severe       => "severe",
            SymptomPhase::Death        => "death",
            SymptomPhase::Recovered    => "recovered",
        };
        f.write_str(s)
    }
}

// ── PhaseSchedule ─────────────────────────────────────────────────────────────

/// An immutable `(phase, start_day)` list plus a cursor.
///
/// `advance(day)` enters at most one phase per call: the entry under the
/// cursor, if and only if its start day equals `day`.
#[derive(Clone, Debug)]
pub struct PhaseSchedule<P> {
    entries: Vec<(P, u32)>,
    cursor:  usize,
    current: Option<P>,
}

impl<P: Copy> PhaseSchedule<P> {
    fn new(entries: Vec<(P, u32)>) -> Self {
        Self { entries, cursor: 0, current: None }
    }

    /// The phase the agent is currently in, or `None` before the first
    /// `advance` (and, on the symptom axis, after recovery clears it).
    #[inline]
    pub fn current(&self) -> Option<P> {
        self.current
    }

    /// The full sampled entry list, cursor-independent.
    #[inline]
    pub fn entries(&self) -> &[(P, u32)] {
        &self.entries
    }

    /// Enter the next phase if its start day is exactly `day`.
    ///
    /// Returns the newly entered phase, or `None` if no transition happens
    /// today.  Start days are strictly increasing, so at most one entry can
    /// match.
    pub fn advance(&mut self, day: u32) -> Option<P> {
        let &(phase, start) = self.entries.get(self.cursor)?;
        if start != day {
            return None;
        }
        self.cursor += 1;
        self.current = Some(phase);
        Some(phase)
    }

    /// Forget the current phase without touching the cursor.  Used by the
    /// symptom axis once the agent has recovered.
    pub(crate) fn clear_current(&mut self) {
        self.current = None;
    }
}

// ── DiseaseCourse ─────────────────────────────────────────────────────────────

/// The four legal symptom phase-name sequences.  Anything else coming out of
/// the sampler is a programming error surfaced as `EpiError::Schedule`.
const LEGAL_SYMPTOM_SEQUENCES: [&[SymptomPhase]; 4] = [
    &[SymptomPhase::Incubation, SymptomPhase::Asymptomatic, SymptomPhase::Recovered],
    &[SymptomPhase::Incubation, SymptomPhase::Mild, SymptomPhase::Recovered],
    &[SymptomPhase::Incubation, SymptomPhase::Mild, SymptomPhase::Severe, SymptomPhase::Recovered],
    &[SymptomPhase::Incubation, SymptomPhase::Mild, SymptomPhase::Severe, SymptomPhase::Death],
];

/// One agent's fully sampled disease course: both phase schedules.
#[derive(Clone, Debug)]
pub struct DiseaseCourse {
    pub infection: PhaseSchedule<InfectionPhase>,
    pub symptoms:  PhaseSchedule<SymptomPhase>,
}

impl DiseaseCourse {
    /// Sample a course from the configured duration ranges and branch
    /// probabilities.
    ///
    /// Fails when a draw violates an ordering invariant (non-positive latent
    /// period, removal at or past the course end, severe/death onset past
    /// the course end).  Callers must abort the run on error.
    pub fn sample(cfg: &DiseaseConfig, rng: &mut SimRng) -> EpiResult<DiseaseCourse> {
        let incubation       = cfg.incubation_range.sample(rng);
        let infectious_lead  = cfg.infectious_start_before_symptoms_range.sample(rng);
        let infectious_len   = cfg.infectious_duration_range.sample(rng);
        let total            = cfg.total_length;

        // ── Infection axis ────────────────────────────────────────────────
        if incubation <= infectious_lead {
            return Err(EpiError::Schedule(format!(
                "latent period must be at least one day \
                 (incubation {incubation}, infectious lead {infectious_lead})"
            )));
        }
        let infectious_start = incubation - infectious_lead;
        let removed_start = infectious_start + infectious_len;
        if removed_start >= total {
            return Err(EpiError::Schedule(format!(
                "removal day {removed_start} must precede course end {total}"
            )));
        }
        let infection = vec![
            (InfectionPhase::Latent, 0),
            (InfectionPhase::Infectious, infectious_start),
            (InfectionPhase::Removed, removed_start),
            (InfectionPhase::Recovered, total),
        ];

        // Symptom onset must fall inside the infectious window.
        if incubation <= infectious_start || incubation >= removed_start {
            return Err(EpiError::Schedule(format!(
                "symptom onset {incubation} outside infectious window \
                 [{infectious_start}, {removed_start})"
            )));
        }

        // ── Symptom axis ──────────────────────────────────────────────────
        let mut symptoms = vec![(SymptomPhase::Incubation, 0)];
        if rng.gen_bool(cfg.asymptomatic_prob) {
            symptoms.push((SymptomPhase::Asymptomatic, incubation));
            symptoms.push((SymptomPhase::Recovered, total));
        } else {
            symptoms.push((SymptomPhase::Mild, incubation));
            if rng.gen_bool(cfg.severe_prob) {
                let severe_start = incubation + cfg.severe_onset_range.sample(rng);
                if severe_start > total {
                    return Err(EpiError::Schedule(format!(
                        "severe onset {severe_start} past course end {total}"
                    )));
                }
                symptoms.push((SymptomPhase::Severe, severe_start));
                if rng.gen_bool(cfg.death_prob) {
                    let death_day = severe_start + cfg.death_onset_range.sample(rng);
                    if death_day > total {
                        return Err(EpiError::Schedule(format!(
                            "death day {death_day} past course end {total}"
                        )));
                    }
                    symptoms.push((SymptomPhase::Death, death_day));
                } else {
                    symptoms.push((SymptomPhase::Recovered, total));
                }
            } else {
                symptoms.push((SymptomPhase::Recovered, total));
            }
        }

        validate_sequence(&symptoms)?;
        validate_monotonic("infection", &infection)?;
        validate_monotonic("symptom", &symptoms)?;

        Ok(DiseaseCourse {
            infection: PhaseSchedule::new(infection),
            symptoms:  PhaseSchedule::new(symptoms),
        })
    }
}

fn validate_sequence(symptoms: &[(SymptomPhase, u32)]) -> EpiResult<()> {
    let names: Vec<SymptomPhase> = symptoms.iter().map(|&(p, _)| p).collect();
    if !LEGAL_SYMPTOM_SEQUENCES.iter().any(|&legal| legal == names.as_slice()) {
        return Err(EpiError::Schedule(format!(
            "illegal symptom sequence {:?}",
            names
        )));
    }
    Ok(())
}

fn validate_monotonic<P: fmt::Display + Copy>(axis: &str, entries: &[(P, u32)]) -> EpiResult<()> {
    for pair in entries.windows(2) {
        let (p1, d1) = pair[0];
        let (p2, d2) = pair[1];
        if d1 >= d2 {
            return Err(EpiError::Schedule(format!(
                "{axis} schedule not strictly increasing: {p1} @ {d1} followed by {p2} @ {d2}"
            )));
        }
    }
    Ok(())
}
