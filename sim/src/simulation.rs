use crate::error::{Result, SimError};
use crate::grid::SpatialGrid;
use crate::observer::{Observer, TracingObserver};
use crate::population::Population;
use crate::random::RandomSource;
use crate::scheduler::Scheduler;
use shared::{
    Parameters, PopulationCounts, Position, Species, StateSnapshot, TickReport, Topology,
    SNAPSHOT_VERSION,
};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub topology: Topology,
    pub parameters: Parameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            seed: 0,
            topology: Topology::Bounded,
            parameters: Parameters::default(),
        }
    }
}

/// A predator-prey run: grid, agents, random stream and scheduler
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: SpatialGrid,
    population: Population,
    rng: RandomSource,
    params: Parameters,
    scheduler: Scheduler,
}

impl Simulation {
    /// Seed a bounded simulation with prey first, then predators, in the given order
    pub fn initialize(
        width: usize,
        height: usize,
        seed: u64,
        initial_prey: &[Position],
        initial_predators: &[Position],
        parameters: Parameters,
    ) -> Result<Self> {
        let config = SimulationConfig {
            width,
            height,
            seed,
            topology: Topology::Bounded,
            parameters,
        };
        Self::from_config(&config, initial_prey, initial_predators)
    }

    pub fn from_config(
        config: &SimulationConfig,
        initial_prey: &[Position],
        initial_predators: &[Position],
    ) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        for &pos in initial_prey {
            sim.population.spawn(&mut sim.grid, Species::Prey, pos)?;
        }
        for &pos in initial_predators {
            sim.population.spawn(&mut sim.grid, Species::Predator, pos)?;
        }

        info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            prey = initial_prey.len(),
            predators = initial_predators.len(),
            "simulation initialized"
        );
        Ok(sim)
    }

    /// Scatter agents uniformly over the grid, drawing from the run's own stream
    pub fn with_random_placement(
        config: &SimulationConfig,
        prey_count: usize,
        predator_count: usize,
    ) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        for (species, count) in [(Species::Prey, prey_count), (Species::Predator, predator_count)] {
            for _ in 0..count {
                let pos = sim.rng.position(config.width, config.height)?;
                sim.population.spawn(&mut sim.grid, species, pos)?;
            }
        }

        info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            prey = prey_count,
            predators = predator_count,
            "simulation initialized with random placement"
        );
        Ok(sim)
    }

    fn empty(config: &SimulationConfig) -> Result<Self> {
        config.parameters.validate()?;
        Ok(Self {
            grid: SpatialGrid::new(config.width, config.height, config.topology)?,
            population: Population::new(),
            rng: RandomSource::new(config.seed),
            params: config.parameters.clone(),
            scheduler: Scheduler::new(),
        })
    }

    /// Continue a run from a snapshot, random stream included
    pub fn restore(snapshot: &StateSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::InvalidArgument(format!(
                "snapshot version {} does not match {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        snapshot.parameters.validate()?;

        let mut grid = SpatialGrid::new(snapshot.width, snapshot.height, snapshot.topology)?;
        let population = Population::restore(&mut grid, &snapshot.agents, snapshot.next_id)?;
        if grid.occupancy() != snapshot.occupancy {
            return Err(SimError::InvalidArgument(
                "snapshot occupancy disagrees with its agent table".into(),
            ));
        }

        info!(
            tick = snapshot.tick,
            agents = population.len(),
            "simulation restored from snapshot"
        );
        Ok(Self {
            grid,
            population,
            rng: RandomSource::from_state(&snapshot.rng),
            params: snapshot.parameters.clone(),
            scheduler: Scheduler::starting_at(snapshot.tick),
        })
    }

    /// Advance one tick, logging events through `tracing`
    pub fn step(&mut self) -> Result<TickReport> {
        self.step_with(&mut TracingObserver)
    }

    /// Advance one tick, reporting events to `observer`
    pub fn step_with(&mut self, observer: &mut dyn Observer) -> Result<TickReport> {
        self.scheduler.run_tick(
            &mut self.grid,
            &mut self.population,
            &mut self.rng,
            &self.params,
            observer,
        )
    }

    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Read-only copy of the grid occupancy and agent table
    pub fn current_state(&self) -> StateSnapshot {
        StateSnapshot {
            version: SNAPSHOT_VERSION,
            tick: self.scheduler.tick(),
            width: self.grid.width,
            height: self.grid.height,
            topology: self.grid.topology(),
            parameters: self.params.clone(),
            agents: self.population.records(),
            occupancy: self.grid.occupancy(),
            next_id: self.population.next_id(),
            rng: self.rng.state(),
        }
    }

    pub fn counts(&self) -> PopulationCounts {
        self.population.counts()
    }

    pub fn tick(&self) -> u64 {
        self.scheduler.tick()
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Full scan of the occupancy invariant
    pub fn verify_invariants(&self) -> Result<()> {
        self.population.verify(&self.grid)
    }
}
