//! The `CellularAutomaton` and its day loop.

use std::collections::{BTreeMap, BTreeSet};

use epi_agent::{Person, Reporter};
use epi_core::{AgentId, Day, EpiConfig, EpiError, SimRng};
use epi_grid::{Grid, Pos};

use crate::observer::{AgentMarker, SimObserver};
use crate::SimResult;

/// The simulation engine.
///
/// Owns the occupancy grid, the agent registry, and the two behavior-group
/// sets, and drives the per-day two-phase update:
///
/// 1. **Non-distancing pass** — every agent in the not-distancing set, in a
///    fresh random order: advance disease state, destroy if dead, else check
///    exposure and run the free movement policy.
/// 2. **Distancing pass** — the same for the distancing set.  Processing
///    this group last means distancing agents reposition relative to the
///    day's *final* occupancy, which is what gives distancing its positional
///    advantage.
/// 3. **Reconciliation** — agents flagged "became distancing" (or the
///    reverse) during either pass are moved between the two sets only now,
///    so no agent is double-processed within one day.
///
/// Group membership always reflects the distancing flag *as it was at the
/// end of the previous day*.
///
/// Fields are public so tests and applications can script scenarios and
/// inspect state; the update methods are the only sanctioned mutation path
/// during a run.
pub struct CellularAutomaton<R: Reporter> {
    /// Run configuration, validated at construction.
    pub config: EpiConfig,

    /// The toroidal occupancy lattice.  Holds agent ids only; agent data
    /// lives in `people`.
    pub grid: Grid,

    /// The agent registry.  `BTreeMap` so iteration order is deterministic.
    pub people: BTreeMap<AgentId, Person>,

    /// Live agents currently social distancing.
    pub distancing: BTreeSet<AgentId>,

    /// Live agents currently not distancing.  Together with `distancing`
    /// this partitions the keys of `people` exactly.
    pub not_distancing: BTreeSet<AgentId>,

    /// The run's single random stream, seeded from `config.seed`.
    pub rng: SimRng,

    /// The statistics collaborator.
    pub reporter: R,
}

impl<R: Reporter> CellularAutomaton<R> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Validate `config`, build the grid, and create the starting
    /// population on uniformly chosen open cells.
    pub fn new(config: EpiConfig, reporter: R) -> SimResult<Self> {
        config.validate()?;

        let mut automaton = CellularAutomaton {
            grid: Grid::new(config.grid.width, config.grid.height),
            people: BTreeMap::new(),
            distancing: BTreeSet::new(),
            not_distancing: BTreeSet::new(),
            rng: SimRng::new(config.seed),
            config,
            reporter,
        };

        for n in 0..automaton.config.grid.population {
            let id = AgentId(n);
            let pos = automaton
                .grid
                .random_open(&mut automaton.rng)
                .ok_or_else(|| EpiError::Config("no open cell left for spawning".into()))?;
            let person = Person::create(id, pos, &automaton.config, &mut automaton.rng)?;
            automaton.grid.place(id, pos)?;
            if person.is_susceptible() {
                automaton.reporter.record_initial_susceptible();
            }
            if person.social_distancing {
                automaton.distancing.insert(id);
            } else {
                automaton.not_distancing.insert(id);
            }
            automaton.people.insert(id, person);
        }

        Ok(automaton)
    }

    /// Number of agents still infected.
    pub fn infected_count(&self) -> usize {
        self.people.values().filter(|p| p.is_infected()).count()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation for `config.days` days, stopping early once no
    /// infected agent remains.
    ///
    /// Calls observer hooks at every day boundary and notifies the reporter
    /// once per day (with the final-day flag on the last one).  Returns the
    /// last simulated day.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Day> {
        let mut day = Day::ZERO;
        for d in 1..=self.config.days {
            day = Day(d);
            observer.on_day_start(day);
            self.step()?;

            for person in self.people.values() {
                self.reporter.record_snapshot(person);
                observer.on_agent(&AgentMarker {
                    id:         person.id,
                    pos:        person.position,
                    status:     person.status(),
                    distancing: person.social_distancing,
                    masked:     person.wears_mask,
                });
            }

            let infected = self.infected_count();
            let is_final = d == self.config.days || infected == 0;
            self.reporter.end_of_day(day, is_final);
            observer.on_day_end(day, infected);
            if is_final {
                break;
            }
        }
        observer.on_sim_end(day);
        Ok(day)
    }

    /// Advance exactly one day: both scheduling passes plus reconciliation,
    /// without the per-day observer/reporter boundary callbacks of
    /// [`run`](Self::run).  Useful for tests and incremental stepping.
    pub fn step(&mut self) -> SimResult<()> {
        let mut changes: Vec<(AgentId, bool)> = Vec::new();

        let mut order: Vec<AgentId> = self.not_distancing.iter().copied().collect();
        self.rng.shuffle(&mut order);
        for id in order {
            self.update_agent(id, &mut changes)?;
        }

        let mut order: Vec<AgentId> = self.distancing.iter().copied().collect();
        self.rng.shuffle(&mut order);
        for id in order {
            self.update_agent(id, &mut changes)?;
        }

        // Deferred reconciliation: group membership changes only take
        // effect now that both passes are complete.
        for (id, now_distancing) in changes {
            if now_distancing {
                self.not_distancing.remove(&id);
                self.distancing.insert(id);
            } else {
                self.distancing.remove(&id);
                self.not_distancing.insert(id);
            }
        }
        Ok(())
    }

    // ── Per-agent update ──────────────────────────────────────────────────

    /// One agent's full daily update: disease progression, exposure check,
    /// movement policy.
    fn update_agent(
        &mut self,
        id:      AgentId,
        changes: &mut Vec<(AgentId, bool)>,
    ) -> SimResult<()> {
        // Detach the record so neighbor lookups never alias the agent being
        // mutated.  Re-inserted below unless the agent died.
        let Some(mut person) = self.people.remove(&id) else {
            return Ok(());
        };

        let outcome = person.advance_one_day(&mut self.reporter);
        if outcome.died {
            self.grid.clear(person.position)?;
            self.distancing.remove(&id);
            self.not_distancing.remove(&id);
            self.reporter.record_death(&person);
            return Ok(());
        }

        // Exposure is checked once before any movement; the movement
        // policies re-check after every successful relocation.
        self.check_exposure(&mut person);
        if person.social_distancing {
            self.move_distancing(&mut person)?;
        } else {
            self.move_free(&mut person)?;
        }

        if let Some(now_distancing) = outcome.distancing_change {
            changes.push((id, now_distancing));
        }
        self.people.insert(id, person);
        Ok(())
    }

    // ── Transmission ──────────────────────────────────────────────────────

    /// Scan `person`'s 8 neighbors for infectious agents and draw against
    /// the compound hazard.  On infection, every infectious neighbor is
    /// credited one onward infection.
    fn check_exposure(&mut self, person: &mut Person) {
        if !person.is_susceptible() {
            return;
        }

        let mut masks: Vec<bool> = Vec::new();
        let mut sources: Vec<AgentId> = Vec::new();
        for cell in self.grid.window(person.position, 3) {
            if cell.rel == (0, 0) {
                continue;
            }
            let Some(other_id) = cell.occupant else { continue };
            if let Some(other) = self.people.get(&other_id)
                && other.is_infectious()
            {
                masks.push(other.wears_mask);
                sources.push(other_id);
            }
        }

        let infected = person.check_exposure(
            &masks,
            self.config.disease.base_infection_prob,
            self.config.disease.mask_infection_prob_decrease,
            &mut self.rng,
        );
        if infected {
            for source in sources {
                if let Some(other) = self.people.get_mut(&source) {
                    other.onward_infections += 1;
                }
            }
            self.reporter.record_new_infection();
        }
    }

    // ── Movement policies ─────────────────────────────────────────────────

    /// Free (non-distancing) movement: on a successful movement draw, up to
    /// `move_length` hops to a uniformly chosen empty neighbor, avoiding
    /// the immediately-previous cell to discourage oscillation.
    fn move_free(&mut self, person: &mut Person) -> SimResult<()> {
        if !self.rng.gen_bool(person.movement_prob) {
            return Ok(());
        }
        let mut previous: Option<Pos> = None;
        for _ in 0..self.config.movement.move_length {
            let empties: Vec<Pos> = self
                .grid
                .window(person.position, 3)
                .filter(|c| c.rel != (0, 0) && c.occupant.is_none())
                .map(|c| c.pos)
                .filter(|&p| Some(p) != previous)
                .collect();
            let Some(&target) = self.rng.choose(&empties) else {
                break;
            };
            self.grid.relocate(person.id, person.position, target)?;
            previous = Some(person.position);
            person.position = target;
            self.check_exposure(person);
        }
        Ok(())
    }

    /// Distancing movement: a forced move (exactly one attempt) when the
    /// current neighborhood is not fully empty, otherwise an intentional
    /// move (up to `move_length` attempts) on a successful movement draw.
    ///
    /// Each attempt shuffles the empty neighbor cells and takes the first
    /// safe one; the agent stays put when none is safe.
    fn move_distancing(&mut self, person: &mut Person) -> SimResult<()> {
        let unsafe_here = self.empty_neighbors(person.position).len() < 8;
        let attempts = if unsafe_here {
            1
        } else if self.rng.gen_bool(person.movement_prob) {
            self.config.movement.move_length
        } else {
            return Ok(());
        };

        for _ in 0..attempts {
            let mut candidates = self.empty_neighbors(person.position);
            self.rng.shuffle(&mut candidates);
            let current = person.position;
            let Some(target) = candidates.into_iter().find(|&c| self.is_safe(c, current)) else {
                break;
            };
            self.grid.relocate(person.id, person.position, target)?;
            person.position = target;
            self.check_exposure(person);
        }
        Ok(())
    }

    /// Empty cells among the 8 neighbors of `pos`.
    fn empty_neighbors(&self, pos: Pos) -> Vec<Pos> {
        self.grid
            .window(pos, 3)
            .filter(|c| c.rel != (0, 0) && c.occupant.is_none())
            .map(|c| c.pos)
            .collect()
    }

    /// A candidate cell is safe when its own 3×3 window, ignoring the
    /// mover's current cell, is entirely empty.
    fn is_safe(&self, candidate: Pos, mover: Pos) -> bool {
        self.grid
            .window(candidate, 3)
            .all(|c| c.pos == mover || c.occupant.is_none())
    }
}
