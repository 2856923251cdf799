use crate::agent::{Activation, Behavior};
use crate::error::{Result, SimError};
use crate::grid::SpatialGrid;
use crate::observer::Observer;
use crate::population::Population;
use crate::random::RandomSource;
use shared::{Parameters, Species, TickReport};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    SnapshotTaken,
    Activating(usize),
    Committing,
}

/// Drives ticks through Idle -> SnapshotTaken -> Activating(i) -> Committing -> Idle.
/// After a failed tick it stays where it stopped and refuses to start another.
#[derive(Debug, Clone)]
pub struct Scheduler {
    phase: Phase,
    tick: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(tick: u64) -> Self {
        Self {
            phase: Phase::Idle,
            tick,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run one full tick
    pub fn run_tick(
        &mut self,
        grid: &mut SpatialGrid,
        population: &mut Population,
        rng: &mut RandomSource,
        params: &Parameters,
        observer: &mut dyn Observer,
    ) -> Result<TickReport> {
        if self.phase != Phase::Idle {
            return Err(SimError::inconsistent(format!(
                "previous tick aborted in phase {:?}",
                self.phase
            )));
        }
        if population.has_pending() {
            return Err(SimError::inconsistent(
                "mutations queued outside of a tick",
            ));
        }

        let tick = self.tick;

        // 1. Snapshot and shuffle the activation order
        let mut order = population.live_agents();
        rng.shuffle(&mut order);
        self.phase = Phase::SnapshotTaken;

        // 2. Activate each agent still alive
        let mut activated = 0;
        let mut skipped = 0;
        for (i, &id) in order.iter().enumerate() {
            self.phase = Phase::Activating(i);

            let species = match population.get(id) {
                Some(agent) if agent.alive => agent.species,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            observer.on_activate(tick, id, species);
            let mut ctx = Activation {
                tick,
                grid: &mut *grid,
                population: &mut *population,
                rng: &mut *rng,
                params,
                observer: &mut *observer,
            };
            species.act(id, &mut ctx)?;
            activated += 1;
        }

        // 3. Commit deaths, then births
        self.phase = Phase::Committing;
        let commit = population.apply_queued(grid)?;
        for agent in &commit.died {
            observer.on_death(tick, agent);
        }
        // Prey only ever die by being eaten
        let hunts = commit
            .died
            .iter()
            .filter(|a| a.species == Species::Prey)
            .count();
        for agent in &commit.born {
            observer.on_birth(tick, agent);
        }

        if cfg!(debug_assertions) {
            population.verify(grid)?;
        }

        self.tick += 1;
        self.phase = Phase::Idle;

        let report = TickReport {
            tick: self.tick,
            counts: population.counts(),
            activated,
            skipped,
            hunts,
            births: commit.born.len(),
            deaths: commit.died.len(),
        };
        debug!(
            tick = report.tick,
            activated,
            skipped,
            hunts,
            births = report.births,
            deaths = report.deaths,
            prey = report.counts.prey,
            predators = report.counts.predators,
            "tick complete"
        );
        Ok(report)
    }
}
