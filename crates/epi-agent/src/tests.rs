//! Unit tests for schedules and disease progression.

use epi_core::{
    AgentId, DiseaseConfig, DurationRange, EpiConfig, GridConfig, MovementConfig, PolicyConfig,
    Pos, SimRng,
};

use crate::person::{HealthStatus, InfectiousDays, Person, infection_probability};
use crate::reporter::Reporter;
use crate::schedule::{DiseaseCourse, InfectionPhase, SymptomPhase};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A deterministic disease course: every range collapsed to a single value.
/// incubation 4, infectious lead 2 → infectious at day 2, removed at day 8,
/// symptoms (if any) at day 4, recovery at day 14.
fn fixed_disease() -> DiseaseConfig {
    DiseaseConfig {
        base_infection_prob:          0.1,
        mask_infection_prob_decrease: 0.05,
        initial_infection_prob:       0.0,
        asymptomatic_prob:            0.0,
        severe_prob:                  0.0,
        death_prob:                   0.0,
        total_length:                 14,
        incubation_range:                       DurationRange::new(4, 4),
        infectious_start_before_symptoms_range: DurationRange::new(2, 2),
        infectious_duration_range:              DurationRange::new(6, 6),
        severe_onset_range:                     DurationRange::new(2, 2),
        death_onset_range:                      DurationRange::new(2, 2),
    }
}

fn base_config() -> EpiConfig {
    EpiConfig {
        grid: GridConfig { width: 10, height: 10, population: 10 },
        policy: PolicyConfig {
            social_distance_prob: 0.0,
            wear_mask_prob:       0.0,
            low_movement_prob:    0.0,
        },
        movement: MovementConfig { low_prob: 0.25, high_prob: 0.75, move_length: 2 },
        disease: fixed_disease(),
        altruistic_prob: 0.0,
        age_range: DurationRange::new(30, 30),
        days: 30,
        seed: 42,
    }
}

/// Reporter that records recovery callbacks for inspection.
#[derive(Default)]
struct Recording {
    recoveries: Vec<(u32, InfectiousDays)>,
}

impl Reporter for Recording {
    fn record_recovery(&mut self, onward: u32, days: &InfectiousDays) {
        self.recoveries.push((onward, *days));
    }
}

fn make_person(cfg: &EpiConfig, rng: &mut SimRng) -> Person {
    Person::create(AgentId(0), Pos::new(0, 0), cfg, rng).unwrap()
}

// ── Schedule sampling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;

    #[test]
    fn sampled_courses_are_legal_and_monotonic() {
        let mut rng = SimRng::new(7);
        let cfg = DiseaseConfig {
            asymptomatic_prob: 0.2,
            severe_prob:       0.5,
            death_prob:        0.5,
            incubation_range:          DurationRange::new(4, 6),
            infectious_duration_range: DurationRange::new(5, 7),
            ..fixed_disease()
        };
        for _ in 0..500 {
            let course = DiseaseCourse::sample(&cfg, &mut rng).unwrap();
            let infection_days: Vec<u32> =
                course.infection.entries().iter().map(|&(_, d)| d).collect();
            assert!(infection_days.windows(2).all(|w| w[0] < w[1]));
            let symptom_days: Vec<u32> =
                course.symptoms.entries().iter().map(|&(_, d)| d).collect();
            assert!(symptom_days.windows(2).all(|w| w[0] < w[1]));

            let names: Vec<SymptomPhase> =
                course.symptoms.entries().iter().map(|&(p, _)| p).collect();
            let legal: [&[SymptomPhase]; 4] = [
                &[SymptomPhase::Incubation, SymptomPhase::Asymptomatic, SymptomPhase::Recovered],
                &[SymptomPhase::Incubation, SymptomPhase::Mild, SymptomPhase::Recovered],
                &[
                    SymptomPhase::Incubation,
                    SymptomPhase::Mild,
                    SymptomPhase::Severe,
                    SymptomPhase::Recovered,
                ],
                &[
                    SymptomPhase::Incubation,
                    SymptomPhase::Mild,
                    SymptomPhase::Severe,
                    SymptomPhase::Death,
                ],
            ];
            assert!(legal.iter().any(|&l| l == names.as_slice()), "illegal sequence {names:?}");
        }
    }

    #[test]
    fn certain_asymptomatic_never_produces_mild() {
        let mut rng = SimRng::new(11);
        let cfg = DiseaseConfig { asymptomatic_prob: 1.0, ..fixed_disease() };
        for _ in 0..100 {
            let course = DiseaseCourse::sample(&cfg, &mut rng).unwrap();
            let names: Vec<SymptomPhase> =
                course.symptoms.entries().iter().map(|&(p, _)| p).collect();
            assert_eq!(
                names,
                vec![SymptomPhase::Incubation, SymptomPhase::Asymptomatic, SymptomPhase::Recovered]
            );
        }
    }

    #[test]
    fn certain_severe_and_death_produces_fatal_sequence() {
        let mut rng = SimRng::new(3);
        let cfg = DiseaseConfig { severe_prob: 1.0, death_prob: 1.0, ..fixed_disease() };
        let course = DiseaseCourse::sample(&cfg, &mut rng).unwrap();
        let names: Vec<SymptomPhase> = course.symptoms.entries().iter().map(|&(p, _)| p).collect();
        assert_eq!(
            names,
            vec![
                SymptomPhase::Incubation,
                SymptomPhase::Mild,
                SymptomPhase::Severe,
                SymptomPhase::Death
            ]
        );
        // severe at 4+2=6, death at 6+2=8
        assert_eq!(course.symptoms.entries()[2].1, 6);
        assert_eq!(course.symptoms.entries()[3].1, 8);
    }

    #[test]
    fn non_positive_latent_period_is_fatal() {
        let mut rng = SimRng::new(1);
        let cfg = DiseaseConfig {
            incubation_range:                       DurationRange::new(2, 2),
            infectious_start_before_symptoms_range: DurationRange::new(2, 2),
            ..fixed_disease()
        };
        assert!(DiseaseCourse::sample(&cfg, &mut rng).is_err());
    }

    #[test]
    fn removal_at_or_past_course_end_is_fatal() {
        let mut rng = SimRng::new(1);
        let cfg = DiseaseConfig {
            infectious_duration_range: DurationRange::new(12, 12),
            ..fixed_disease()
        };
        assert!(DiseaseCourse::sample(&cfg, &mut rng).is_err());
    }

    #[test]
    fn death_past_course_end_is_fatal() {
        let mut rng = SimRng::new(1);
        let cfg = DiseaseConfig {
            severe_prob: 1.0,
            death_prob:  1.0,
            severe_onset_range: DurationRange::new(6, 6),
            death_onset_range:  DurationRange::new(9, 9),
            ..fixed_disease()
        };
        assert!(DiseaseCourse::sample(&cfg, &mut rng).is_err());
    }

    #[test]
    fn advance_enters_at_most_one_phase_per_day() {
        let mut rng = SimRng::new(5);
        let course = DiseaseCourse::sample(&fixed_disease(), &mut rng).unwrap();
        let mut infection = course.infection;
        assert_eq!(infection.current(), None);
        assert_eq!(infection.advance(0), Some(InfectionPhase::Latent));
        // Day 1: no entry starts, nothing happens.
        assert_eq!(infection.advance(1), None);
        assert_eq!(infection.current(), Some(InfectionPhase::Latent));
        assert_eq!(infection.advance(2), Some(InfectionPhase::Infectious));
        assert_eq!(infection.advance(8), Some(InfectionPhase::Removed));
        assert_eq!(infection.advance(14), Some(InfectionPhase::Recovered));
        assert_eq!(infection.advance(15), None);
    }
}

// ── Transmission math ─────────────────────────────────────────────────────────

#[cfg(test)]
mod transmission {
    use super::*;

    #[test]
    fn no_neighbors_no_hazard() {
        assert_eq!(infection_probability(0.4, 0.1, &[]), 0.0);
    }

    #[test]
    fn masking_never_increases_hazard() {
        // Flip one neighbor's mask on, holding the rest constant.
        let unmasked = infection_probability(0.4, 0.1, &[false, false, true]);
        let masked = infection_probability(0.4, 0.1, &[true, false, true]);
        assert!(masked <= unmasked, "masked {masked} > unmasked {unmasked}");
    }

    #[test]
    fn hazard_non_decreasing_in_neighbor_count() {
        let mut last = 0.0;
        for r in 1..=8 {
            let p = infection_probability(0.2, 0.05, &vec![false; r]);
            assert!(p >= last, "r={r}: {p} < {last}");
            last = p;
        }
    }

    #[test]
    fn certain_base_prob_always_infects() {
        assert!((infection_probability(1.0, 0.0, &[false]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn exposure_noop_unless_susceptible() {
        let mut rng = SimRng::new(2);
        let mut cfg = base_config();
        cfg.disease.initial_infection_prob = 1.0;
        let mut person = make_person(&cfg, &mut rng);
        assert!(person.is_infected());
        assert!(!person.check_exposure(&[false; 8], 1.0, 0.0, &mut rng));
    }

    #[test]
    fn certain_exposure_infects_and_starts_course() {
        let mut rng = SimRng::new(2);
        let cfg = base_config();
        let mut person = make_person(&cfg, &mut rng);
        assert!(person.is_susceptible());
        assert_eq!(person.infection_step, -1);

        assert!(person.check_exposure(&[false], 1.0, 0.0, &mut rng));
        assert!(person.is_infected());
        assert_eq!(person.infection_step, 0);
        assert_eq!(person.infection_phase(), Some(InfectionPhase::Latent));
        assert_eq!(person.symptom_phase(), Some(SymptomPhase::Incubation));
    }
}

// ── Disease progression ───────────────────────────────────────────────────────

#[cfg(test)]
mod progression {
    use super::*;

    /// Create an initially infected person with the given config overrides.
    fn infected_person(mut cfg: EpiConfig, seed: u64) -> (Person, EpiConfig) {
        cfg.disease.initial_infection_prob = 1.0;
        let mut rng = SimRng::new(seed);
        (make_person(&cfg, &mut rng), cfg)
    }

    #[test]
    fn advance_is_noop_for_susceptible() {
        let mut rng = SimRng::new(4);
        let mut person = make_person(&base_config(), &mut rng);
        let mut reporter = Recording::default();
        let outcome = person.advance_one_day(&mut reporter);
        assert!(!outcome.died);
        assert!(outcome.distancing_change.is_none());
        assert_eq!(person.infection_step, -1);
    }

    #[test]
    fn status_is_always_exclusive_through_full_course() {
        let (mut person, _) = infected_person(base_config(), 4);
        let mut reporter = Recording::default();
        for _ in 0..14 {
            // `status()` returns a single enum value; exercising the whole
            // course shows each day maps to exactly one of the three states.
            match person.status() {
                HealthStatus::Susceptible | HealthStatus::Infected | HealthStatus::Recovered => {}
            }
            person.advance_one_day(&mut reporter);
        }
        assert!(person.is_recovered());
        assert!(!person.is_infected());
    }

    #[test]
    fn altruist_reacts_to_mild_symptoms() {
        let mut cfg = base_config();
        cfg.altruistic_prob = 1.0;
        let (mut person, cfg) = infected_person(cfg, 4);
        assert!(!person.social_distancing);
        let mut reporter = Recording::default();

        // Days 1-3: incubating, no behavior change.
        for _ in 0..3 {
            let outcome = person.advance_one_day(&mut reporter);
            assert!(outcome.distancing_change.is_none());
        }
        // Day 4: mild symptoms.
        let outcome = person.advance_one_day(&mut reporter);
        assert_eq!(outcome.distancing_change, Some(true));
        assert!(person.social_distancing);
        assert!(person.wears_mask);
        assert_eq!(person.movement_prob, cfg.movement.low_prob);
    }

    #[test]
    fn non_altruist_ignores_mild_symptoms() {
        let (mut person, _) = infected_person(base_config(), 4);
        let mut reporter = Recording::default();
        for _ in 0..4 {
            let outcome = person.advance_one_day(&mut reporter);
            assert!(outcome.distancing_change.is_none());
        }
        assert_eq!(person.symptom_phase(), Some(SymptomPhase::Mild));
        assert!(!person.social_distancing);
        assert!(!person.wears_mask);
    }

    #[test]
    fn severe_symptoms_stop_movement_for_everyone() {
        let mut cfg = base_config();
        cfg.disease.severe_prob = 1.0;
        let (mut person, _) = infected_person(cfg, 4);
        let mut reporter = Recording::default();
        // severe at day 4 + 2 = 6
        for _ in 0..6 {
            person.advance_one_day(&mut reporter);
        }
        assert_eq!(person.symptom_phase(), Some(SymptomPhase::Severe));
        assert_eq!(person.movement_prob, 0.0);
        assert!(person.wears_mask);
        assert!(person.social_distancing);
    }

    #[test]
    fn recovery_restores_baselines_and_reports_lifetime() {
        let mut cfg = base_config();
        cfg.altruistic_prob = 1.0;
        let (mut person, cfg) = infected_person(cfg, 4);
        person.onward_infections = 3;
        let mut reporter = Recording::default();

        let mut changes = Vec::new();
        for _ in 0..14 {
            let outcome = person.advance_one_day(&mut reporter);
            assert!(!outcome.died);
            if let Some(c) = outcome.distancing_change {
                changes.push(c);
            }
        }
        assert!(person.is_recovered());
        // Mild at day 4 turned distancing on; recovery at day 14 restored the
        // not-distancing baseline.
        assert_eq!(changes, vec![true, false]);
        assert!(!person.social_distancing);
        assert!(!person.wears_mask);
        assert_eq!(person.movement_prob, cfg.movement.high_prob);

        assert_eq!(reporter.recoveries.len(), 1);
        let (onward, days) = reporter.recoveries[0];
        assert_eq!(onward, 3);
        // Infectious days 2..8, with distancing/masking active from day 4 on.
        assert_eq!(days.distancing + days.not_distancing, 6);
        assert!(days.majority_distancing());
        assert!(days.majority_masked());
    }

    #[test]
    fn death_day_returns_terminal_outcome() {
        let mut cfg = base_config();
        cfg.disease.severe_prob = 1.0;
        cfg.disease.death_prob = 1.0;
        let (mut person, _) = infected_person(cfg, 4);
        let mut reporter = Recording::default();

        // severe at 6, death at 8
        for day in 1..8 {
            let outcome = person.advance_one_day(&mut reporter);
            assert!(!outcome.died, "died early on day {day}");
        }
        let outcome = person.advance_one_day(&mut reporter);
        assert!(outcome.died);
        assert!(outcome.distancing_change.is_none());
        assert_eq!(person.symptom_phase(), Some(SymptomPhase::Death));
        // Terminal: still flagged infected; the engine destroys the agent.
        assert!(person.is_infected());
    }

    #[test]
    fn infectious_window_matches_schedule() {
        let (mut person, _) = infected_person(base_config(), 4);
        let mut reporter = Recording::default();
        let mut infectious_on: Vec<i32> = Vec::new();
        for _ in 0..14 {
            person.advance_one_day(&mut reporter);
            if person.is_infectious() {
                infectious_on.push(person.infection_step);
            }
        }
        assert_eq!(infectious_on, (2..8).collect::<Vec<i32>>());
    }
}
