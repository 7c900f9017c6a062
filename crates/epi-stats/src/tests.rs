//! Tests for the collector and the CSV backend.

use epi_core::Day;

use crate::collector::DataCollector;
use crate::row::{BinAverages, DayCounts, StageCounts};

// ── Aggregate record types ────────────────────────────────────────────────────

#[cfg(test)]
mod counts {
    use super::*;

    #[test]
    fn stage_counts_split_by_behavior() {
        let mut c = StageCounts::default();
        c.tally(true, true);
        c.tally(true, false);
        c.tally(false, true);
        c.tally(false, false);
        assert_eq!(c.total, 4);
        assert_eq!(c.distancing, 2);
        assert_eq!(c.masked, 2);
        assert_eq!(c.both, 1);
        assert_eq!(c.neither, 1);
    }

    #[test]
    fn categories_cover_every_field() {
        let counts = DayCounts::default();
        let names: Vec<&str> = counts.categories().iter().map(|&(n, _)| n).collect();
        assert_eq!(
            names,
            ["susceptible", "infected", "recovered", "mild", "severe", "asymptomatic", "deaths"]
        );
    }
}

// ── Collector aggregation ─────────────────────────────────────────────────────

#[cfg(test)]
mod collector_tests {
    use epi_agent::{InfectiousDays, Reporter};

    use super::*;

    fn quiet() -> DataCollector {
        DataCollector::new().with_print_frequency(0)
    }

    fn infectious_days(distancing: u32, masked: u32) -> InfectiousDays {
        InfectiousDays {
            distancing,
            not_distancing: 6 - distancing,
            masked,
            unmasked: 6 - masked,
        }
    }

    #[test]
    fn secondary_attack_rate_is_total_over_initial() {
        let mut collector = quiet();
        for _ in 0..10 {
            collector.record_initial_susceptible();
        }
        for _ in 0..4 {
            collector.record_new_infection();
        }
        assert_eq!(collector.secondary_attack_rate(), Some(0.4));
    }

    #[test]
    fn secondary_attack_rate_undefined_without_susceptibles() {
        assert_eq!(quiet().secondary_attack_rate(), None);
    }

    #[test]
    fn bin_closes_on_boundary_with_mean_onward() {
        let mut collector = quiet().with_bin_size(5);
        collector.record_recovery(2, &infectious_days(6, 6));
        collector.record_recovery(4, &infectious_days(5, 6));
        for d in 1..=5 {
            collector.end_of_day(Day(d), false);
        }

        let bins = collector.bin_averages();
        assert_eq!(bins.len(), 1);
        let (day, bin) = bins[0];
        assert_eq!(day, Day(5));
        assert_eq!(bin.overall, Some(3.0));
        assert_eq!(bin.distancing, Some(3.0));
        assert_eq!(bin.not_distancing, None);
        assert_eq!(bin.masked, Some(3.0));
    }

    #[test]
    fn empty_bin_carries_previous_average_forward() {
        let mut collector = quiet().with_bin_size(5);
        collector.record_recovery(3, &infectious_days(6, 0));
        for d in 1..=10 {
            collector.end_of_day(Day(d), false);
        }

        let bins = collector.bin_averages();
        assert_eq!(bins.len(), 2);
        // No recovery in days 6-10: day-10 bin repeats the day-5 averages.
        assert_eq!(bins[0].1, bins[1].1);
        assert_eq!(bins[1].1.overall, Some(3.0));
        assert_eq!(bins[1].1.unmasked, Some(3.0));
        assert_eq!(bins[1].1.masked, None);
    }

    #[test]
    fn fallback_is_per_slot_not_per_bin() {
        let mut collector = quiet().with_bin_size(5);
        // First bin: one masked lifetime only.
        collector.record_recovery(2, &infectious_days(0, 6));
        for d in 1..=5 {
            collector.end_of_day(Day(d), false);
        }
        // Second bin: one unmasked lifetime only.
        collector.record_recovery(6, &infectious_days(0, 0));
        for d in 6..=10 {
            collector.end_of_day(Day(d), false);
        }

        let second: BinAverages = collector.bin_averages()[1].1;
        assert_eq!(second.overall, Some(6.0));
        assert_eq!(second.unmasked, Some(6.0));
        // No masked lifetime this bin: carried from the first.
        assert_eq!(second.masked, Some(2.0));
    }

    #[test]
    fn history_records_each_day_and_resets() {
        let mut collector = quiet();
        collector.end_of_day(Day(1), false);
        collector.end_of_day(Day(2), true);
        let history = collector.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].0, Day(1));
        assert_eq!(history[1].1, DayCounts::default());
    }

    #[test]
    fn snapshots_fill_status_and_symptom_categories() {
        use epi_core::{
            AgentId, DiseaseConfig, DurationRange, EpiConfig, GridConfig, MovementConfig,
            PolicyConfig, Pos, SimRng,
        };

        let cfg = EpiConfig {
            grid: GridConfig { width: 8, height: 8, population: 2 },
            policy: PolicyConfig {
                social_distance_prob: 0.0,
                wear_mask_prob:       0.0,
                low_movement_prob:    0.0,
            },
            movement: MovementConfig { low_prob: 0.25, high_prob: 0.75, move_length: 2 },
            disease: DiseaseConfig {
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
            },
            altruistic_prob: 0.0,
            age_range: DurationRange::new(30, 30),
            days: 30,
            seed: 1,
        };
        let mut rng = SimRng::new(1);
        let susceptible =
            epi_agent::Person::create(AgentId(0), Pos::new(0, 0), &cfg, &mut rng).unwrap();

        let mut infected_cfg = cfg;
        infected_cfg.disease.initial_infection_prob = 1.0;
        let infected =
            epi_agent::Person::create(AgentId(1), Pos::new(1, 1), &infected_cfg, &mut rng)
                .unwrap();

        let mut collector = quiet();
        collector.record_snapshot(&susceptible);
        collector.record_snapshot(&infected);
        collector.end_of_day(Day(1), false);

        let (_, counts) = collector.history()[0];
        assert_eq!(counts.susceptible.total, 1);
        assert_eq!(counts.infected.total, 1);
        // Freshly infected: still incubating, no symptom category yet.
        assert_eq!(counts.mild.total, 0);
        assert_eq!(counts.asymptomatic.total, 0);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::StatsCsvWriter;

    use super::*;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = StatsCsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("day_counts.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["day", "category", "total", "distancing", "masked", "both", "neither"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("r0_bins.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["day", "overall", "distancing", "not_distancing", "masked", "unmasked"]);
    }

    #[test]
    fn day_row_per_category() {
        let dir = tmp();
        let mut w = StatsCsvWriter::new(dir.path()).unwrap();
        let mut counts = DayCounts::default();
        counts.infected.tally(true, true);
        w.write_day(Day(3), &counts).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("day_counts.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 7);
        let infected = rows.iter().find(|r| &r[1] == "infected").unwrap();
        assert_eq!(&infected[0], "3");
        assert_eq!(&infected[2], "1"); // total
        assert_eq!(&infected[5], "1"); // both
    }

    #[test]
    fn bin_row_leaves_empty_slots_blank() {
        let dir = tmp();
        let mut w = StatsCsvWriter::new(dir.path()).unwrap();
        let bin = BinAverages { overall: Some(2.5), ..BinAverages::default() };
        w.write_bin(Day(5), &bin).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("r0_bins.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "2.5000");
        assert_eq!(&rows[0][2], "");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = StatsCsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn integration_full_run() {
        use epi_core::{
            DiseaseConfig, DurationRange, EpiConfig, GridConfig, MovementConfig, PolicyConfig,
        };
        use epi_sim::{CellularAutomaton, NoopObserver};

        let cfg = EpiConfig {
            grid: GridConfig { width: 12, height: 12, population: 60 },
            policy: PolicyConfig::MEDIUM,
            movement: MovementConfig { low_prob: 0.25, high_prob: 0.75, move_length: 2 },
            disease: DiseaseConfig {
                base_infection_prob:          0.6,
                mask_infection_prob_decrease: 0.2,
                initial_infection_prob:       0.2,
                asymptomatic_prob:            0.3,
                severe_prob:                  0.3,
                death_prob:                   0.3,
                total_length:                 14,
                incubation_range:                       DurationRange::new(3, 5),
                infectious_start_before_symptoms_range: DurationRange::new(1, 2),
                infectious_duration_range:              DurationRange::new(5, 7),
                severe_onset_range:                     DurationRange::new(1, 3),
                death_onset_range:                      DurationRange::new(1, 2),
            },
            altruistic_prob: 0.5,
            age_range: DurationRange::new(5, 90),
            days: 25,
            seed: 11,
        };

        let dir = tmp();
        let writer = StatsCsvWriter::new(dir.path()).unwrap();
        let collector = DataCollector::new().with_print_frequency(0).with_csv(writer);
        let mut automaton = CellularAutomaton::new(cfg, collector).unwrap();
        let last = automaton.run(&mut NoopObserver).unwrap();
        assert!(automaton.reporter.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("day_counts.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), last.0 as usize * 7, "seven category rows per simulated day");
        assert_eq!(automaton.reporter.history().len(), last.0 as usize);
    }
}
