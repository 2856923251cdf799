pub mod agent;
pub mod error;
pub mod grid;
pub mod observer;
pub mod population;
pub mod random;
pub mod scheduler;
pub mod simulation;

pub use agent::{Activation, Agent, Behavior};
pub use error::{Result, SimError};
pub use grid::SpatialGrid;
pub use observer::{EventLog, NullObserver, Observer, TracingObserver};
pub use population::Population;
pub use random::RandomSource;
pub use scheduler::{Phase, Scheduler};
pub use simulation::{Simulation, SimulationConfig};

use shared::{Position, TickReport};

/// Run a complete simulation from explicit initial positions
pub fn run_simulation(
    config: &SimulationConfig,
    initial_prey: &[Position],
    initial_predators: &[Position],
    ticks: u64,
) -> Result<Vec<TickReport>> {
    let mut sim = Simulation::from_config(config, initial_prey, initial_predators)?;
    sim.run(ticks)
}
