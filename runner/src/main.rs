mod config;
mod driver;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runner=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::RunConfig::load()?;

    tracing::info!("Starting predator-prey run");
    tracing::info!(
        "Grid {}x{}, seed {}, {} ticks",
        config.width,
        config.height,
        config.seed,
        config.ticks
    );

    let summary = driver::run(&config)?;
    tracing::info!(
        "Finished after {} ticks: {} prey, {} predators",
        summary.ticks_run,
        summary.final_counts.prey,
        summary.final_counts.predators
    );
    Ok(())
}
