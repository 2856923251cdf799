use crate::config::RunConfig;
use anyhow::{Context, Result};
use shared::PopulationCounts;
use sim::Simulation;

/// Outcome of a headless run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub final_counts: PopulationCounts,
    /// Counts after every tick, for an external reporter
    pub history: Vec<PopulationCounts>,
}

/// Seed a simulation from the config and advance it tick by tick
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut sim = Simulation::with_random_placement(
        &config.simulation(),
        config.initial_prey,
        config.initial_predators,
    )
    .context("Failed to initialize simulation")?;

    let mut history = Vec::new();
    for _ in 0..config.ticks {
        let report = sim
            .step()
            .with_context(|| format!("Tick {} failed", sim.tick()))?;

        tracing::info!(
            "tick {:>5}  prey {:>6}  predators {:>6}",
            report.tick,
            report.counts.prey,
            report.counts.predators
        );
        history.push(report.counts);

        if config.stop_on_extinction && report.counts.is_extinct() {
            tracing::warn!("Both species extinct at tick {}", report.tick);
            break;
        }
    }

    Ok(RunSummary {
        ticks_run: sim.tick(),
        final_counts: sim.counts(),
        history,
    })
}
