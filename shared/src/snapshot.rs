use crate::{AgentId, Parameters, Position, Species, Topology};
use serde::{Deserialize, Serialize};

/// One row of the agent table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub species: Species,
    pub position: Position,
    pub alive: bool,
}

/// The agents currently standing on one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOccupancy {
    pub position: Position,
    pub agents: Vec<AgentId>,
}

/// Live agent counts per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub prey: usize,
    pub predators: usize,
}

impl PopulationCounts {
    pub fn total(&self) -> usize {
        self.prey + self.predators
    }

    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Prey => self.prey,
            Species::Predator => self.predators,
        }
    }

    /// Both species have died out
    pub fn is_extinct(&self) -> bool {
        self.total() == 0
    }
}

/// Summary of a single tick, returned by `step()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Number of ticks completed, including this one
    pub tick: u64,

    /// Live counts after the commit phase
    pub counts: PopulationCounts,

    /// Agents in the snapshot that acted
    pub activated: usize,

    /// Agents in the snapshot skipped because they died earlier in the tick
    pub skipped: usize,

    pub hunts: usize,
    pub births: usize,
    pub deaths: usize,
}

/// Position of the ChaCha stream, enough to resume it exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: [u8; 32],
    pub stream: u64,
    /// Word position split in two halves so every serde format can carry it
    pub word_pos_hi: u64,
    pub word_pos_lo: u64,
}

impl RngState {
    pub fn word_pos(&self) -> u128 {
        (u128::from(self.word_pos_hi) << 64) | u128::from(self.word_pos_lo)
    }

    pub fn with_word_pos(mut self, word_pos: u128) -> Self {
        self.word_pos_hi = (word_pos >> 64) as u64;
        self.word_pos_lo = word_pos as u64;
        self
    }
}

/// Read-only copy of the whole simulation at a tick boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u32,
    pub tick: u64,
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    pub parameters: Parameters,

    /// Agent table ordered by id
    pub agents: Vec<AgentRecord>,

    /// Non-empty cells in row-major order
    pub occupancy: Vec<CellOccupancy>,

    /// Identity the next spawned agent will receive
    pub next_id: u64,

    pub rng: RngState,
}

impl StateSnapshot {
    pub fn counts(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for agent in self.agents.iter().filter(|a| a.alive) {
            match agent.species {
                Species::Prey => counts.prey += 1,
                Species::Predator => counts.predators += 1,
            }
        }
        counts
    }

    /// Positions of every live agent of one species
    pub fn positions(&self, species: Species) -> Vec<Position> {
        self.agents
            .iter()
            .filter(|a| a.alive && a.species == species)
            .map(|a| a.position)
            .collect()
    }
}
