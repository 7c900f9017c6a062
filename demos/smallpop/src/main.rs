//! smallpop — end-to-end demo for the rust_epi cellular automaton.
//!
//! Runs a 900-agent epidemic on a 60×60 torus with medium behavioral
//! compliance, printing day summaries every 5 days and writing the full
//! statistics to `output/smallpop/`.  Edit `CONFIG_JSON` (or load a file
//! instead) to explore other policies.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use epi_agent::HealthStatus;
use epi_core::{Day, EpiConfig};
use epi_sim::{CellularAutomaton, SimObserver};
use epi_stats::{DataCollector, StatsCsvWriter};

// ── Run configuration ─────────────────────────────────────────────────────────

const CONFIG_JSON: &str = r#"{
  "grid":     { "width": 60, "height": 60, "population": 900 },
  "policy":   { "social_distance_prob": 0.5, "wear_mask_prob": 0.5, "low_movement_prob": 0.5 },
  "movement": { "low_prob": 0.25, "high_prob": 0.75, "move_length": 2 },
  "disease": {
    "base_infection_prob": 0.2,
    "mask_infection_prob_decrease": 0.1,
    "initial_infection_prob": 0.02,
    "asymptomatic_prob": 0.3,
    "severe_prob": 0.25,
    "death_prob": 0.3,
    "total_length": 18,
    "incubation_range":                       { "min": 4, "max": 6 },
    "infectious_start_before_symptoms_range": { "min": 1, "max": 2 },
    "infectious_duration_range":              { "min": 6, "max": 9 },
    "severe_onset_range":                     { "min": 1, "max": 3 },
    "death_onset_range":                      { "min": 1, "max": 3 }
  },
  "altruistic_prob": 0.5,
  "age_range": { "min": 1, "max": 90 },
  "days": 120,
  "seed": 42
}"#;

// ── Progress observer ─────────────────────────────────────────────────────────

#[derive(Default)]
struct PeakTracker {
    peak_infected: usize,
    peak_day:      Day,
}

impl SimObserver for PeakTracker {
    fn on_day_end(&mut self, day: Day, infected: usize) {
        if infected > self.peak_infected {
            self.peak_infected = infected;
            self.peak_day = day;
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== smallpop — rust_epi cellular automaton ===");

    // 1. Parse the embedded run configuration.
    let config: EpiConfig = serde_json::from_str(CONFIG_JSON)?;
    println!(
        "Grid: {}×{}  |  Population: {}  |  Days: {}  |  Seed: {}",
        config.grid.width, config.grid.height, config.grid.population, config.days, config.seed
    );
    println!();

    // 2. Set up the statistics collector with CSV output.
    std::fs::create_dir_all("output/smallpop")?;
    let writer = StatsCsvWriter::new(Path::new("output/smallpop"))?;
    let collector = DataCollector::new()
        .with_bin_size(5)
        .with_print_frequency(5)
        .with_csv(writer);

    // 3. Build the automaton (validates the config and seeds the population).
    let mut automaton = CellularAutomaton::new(config, collector)?;
    println!(
        "Created {} agents ({} initially infected, {} distancing)",
        automaton.people.len(),
        automaton.infected_count(),
        automaton.distancing.len(),
    );
    println!();

    // 4. Run.
    let mut tracker = PeakTracker::default();
    let t0 = Instant::now();
    let last_day = automaton.run(&mut tracker)?;
    let elapsed = t0.elapsed();

    if let Some(e) = automaton.reporter.take_error() {
        eprintln!("output error: {e}");
    }
    println!();

    // 5. Summary.
    println!(
        "Simulation complete in {:.3} s ({last_day} of {} scheduled)",
        elapsed.as_secs_f64(),
        config.days
    );
    println!("Peak infections: {} on {}", tracker.peak_infected, tracker.peak_day);
    if let Some(sar) = automaton.reporter.secondary_attack_rate() {
        println!("Secondary attack rate: {sar:.2}");
    }
    if let Some(&(day, bin)) = automaton.reporter.bin_averages().last()
        && let Some(r0) = bin.overall
    {
        println!("Reproduction-number estimate ({day}): {r0:.2}");
    }
    println!();

    // 6. Final population table.
    let mut susceptible = 0usize;
    let mut infected = 0usize;
    let mut recovered = 0usize;
    for person in automaton.people.values() {
        match person.status() {
            HealthStatus::Susceptible => susceptible += 1,
            HealthStatus::Infected => infected += 1,
            HealthStatus::Recovered => recovered += 1,
        }
    }
    let dead = config.grid.population as usize - automaton.people.len();
    println!("{:<14} {:>6}", "Status", "Count");
    println!("{}", "-".repeat(21));
    println!("{:<14} {:>6}", "susceptible", susceptible);
    println!("{:<14} {:>6}", "infected", infected);
    println!("{:<14} {:>6}", "recovered", recovered);
    println!("{:<14} {:>6}", "dead", dead);
    println!();
    println!("Wrote output/smallpop/day_counts.csv and output/smallpop/r0_bins.csv");

    Ok(())
}
