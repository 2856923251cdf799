use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::{Parameters, Topology};
use sim::SimulationConfig;
use std::env;
use std::path::Path;

/// Everything needed for one headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub topology: Topology,
    pub parameters: Parameters,
    pub initial_prey: usize,
    pub initial_predators: usize,
    pub ticks: u64,
    /// Stop early once both species are gone
    pub stop_on_extinction: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            seed: 0,
            topology: Topology::Bounded,
            parameters: Parameters::default(),
            initial_prey: 50,
            initial_predators: 10,
            ticks: 100,
            stop_on_extinction: true,
        }
    }
}

impl RunConfig {
    /// Read `SIM_CONFIG` (JSON file) if set, then apply `SIM_SEED` and `SIM_TICKS` overrides
    pub fn load() -> Result<Self> {
        let mut config = match env::var("SIM_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(seed) = env::var("SIM_SEED") {
            config.seed = seed.parse().context("SIM_SEED must be an unsigned integer")?;
        }
        if let Ok(ticks) = env::var("SIM_TICKS") {
            config.ticks = ticks.parse().context("SIM_TICKS must be an unsigned integer")?;
        }

        config
            .parameters
            .validate()
            .context("Invalid simulation parameters")?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            width: self.width,
            height: self.height,
            seed: self.seed,
            topology: self.topology,
            parameters: self.parameters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = RunConfig::from_json(
            r#"{"width": 8, "topology": "toroidal", "parameters": {"prey_reproduction_chance": 0.5}}"#,
        )
        .unwrap();

        assert_eq!(config.width, 8);
        assert_eq!(config.height, 20);
        assert_eq!(config.topology, Topology::Toroidal);
        assert_eq!(config.parameters.prey_reproduction_chance, 0.5);
        assert_eq!(config.parameters.neighborhood_radius, 1);
        assert!(config.stop_on_extinction);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(RunConfig::from_json("{ width: ").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = RunConfig::from_file(Path::new("/nonexistent/run.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_simulation_config_carries_fields() {
        let config = RunConfig {
            seed: 9,
            ..Default::default()
        };
        let sim = config.simulation();
        assert_eq!(sim.seed, 9);
        assert_eq!(sim.width, config.width);
        assert_eq!(sim.parameters, config.parameters);
    }
}
