use crate::error::{Result, SimError};
use crate::grid::SpatialGrid;
use crate::Agent;
use shared::{AgentId, AgentRecord, PopulationCounts, Position, Species};
use std::collections::BTreeMap;

/// Queued mutations that were applied at the end of a tick
#[derive(Debug, Clone, Default)]
pub struct Commit {
    pub died: Vec<Agent>,
    pub born: Vec<Agent>,
}

/// Agent table plus the per-tick birth and death queues
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: BTreeMap<AgentId, Agent>,
    next_id: u64,
    pending_births: Vec<(Species, Position)>,
    pending_deaths: Vec<AgentId>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a population from snapshot records, placing each live agent on the grid
    pub fn restore(
        grid: &mut SpatialGrid,
        records: &[AgentRecord],
        next_id: u64,
    ) -> Result<Self> {
        let mut agents = BTreeMap::new();
        for record in records.iter().filter(|r| r.alive) {
            if record.id.0 >= next_id {
                return Err(SimError::InvalidArgument(format!(
                    "agent {} is not below the next identity {next_id}",
                    record.id
                )));
            }
            if agents.contains_key(&record.id) {
                return Err(SimError::InvalidArgument(format!(
                    "agent {} appears twice",
                    record.id
                )));
            }
            grid.place(record.id, record.position)?;
            agents.insert(record.id, Agent::from(record));
        }

        Ok(Self {
            agents,
            next_id,
            ..Self::default()
        })
    }

    pub fn spawn(
        &mut self,
        grid: &mut SpatialGrid,
        species: Species,
        pos: Position,
    ) -> Result<AgentId> {
        let id = AgentId(self.next_id);
        grid.place(id, pos)?;
        self.next_id += 1;
        self.agents.insert(id, Agent::new(id, species, pos));
        Ok(id)
    }

    pub fn queue_birth(&mut self, species: Species, pos: Position) {
        self.pending_births.push((species, pos));
    }

    /// Record a death to be applied at tick end.
    ///
    /// The agent is marked not alive right away, so the scheduler skips it
    /// and no other predator can pick it, but it stays on the grid until
    /// commit.
    pub fn queue_death(&mut self, id: AgentId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or_else(|| SimError::inconsistent(format!("death queued for unknown agent {id}")))?;
        if !agent.alive {
            return Err(SimError::inconsistent(format!(
                "death queued twice for agent {id}"
            )));
        }
        agent.alive = false;
        self.pending_deaths.push(id);
        Ok(())
    }

    /// Apply queued deaths, then queued births, and clear both queues
    pub fn apply_queued(&mut self, grid: &mut SpatialGrid) -> Result<Commit> {
        let deaths = std::mem::take(&mut self.pending_deaths);
        let births = std::mem::take(&mut self.pending_births);
        let mut commit = Commit::default();

        for id in deaths {
            let agent = self.agents.remove(&id).ok_or_else(|| {
                SimError::inconsistent(format!("queued death for missing agent {id}"))
            })?;
            grid.remove(id, agent.position)?;
            commit.died.push(agent);
        }

        for (species, pos) in births {
            let id = self.spawn(grid, species, pos)?;
            commit.born.push(Agent::new(id, species, pos));
        }

        Ok(commit)
    }

    pub fn live_agents(&self) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|a| a.alive)
            .map(|a| a.id)
            .collect()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn require(&self, id: AgentId) -> Result<&Agent> {
        self.agents
            .get(&id)
            .ok_or_else(|| SimError::inconsistent(format!("unknown agent {id}")))
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.agents.get(&id).is_some_and(|a| a.alive)
    }

    /// Move an agent on the grid and update its own position to match
    pub fn relocate(&mut self, grid: &mut SpatialGrid, id: AgentId, to: Position) -> Result<()> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or_else(|| SimError::inconsistent(format!("move of unknown agent {id}")))?;
        grid.move_agent(id, agent.position, to)?;
        agent.position = to;

        if !grid.occupants(to)?.contains(&id) {
            return Err(SimError::inconsistent(format!(
                "agent {id} moved to {to} but the grid does not list it there"
            )));
        }
        Ok(())
    }

    pub fn counts(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for agent in self.agents.values().filter(|a| a.alive) {
            match agent.species {
                Species::Prey => counts.prey += 1,
                Species::Predator => counts.predators += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_births.is_empty() || !self.pending_deaths.is_empty()
    }

    pub fn records(&self) -> Vec<AgentRecord> {
        self.agents.values().map(AgentRecord::from).collect()
    }

    /// Full occupancy check: every live agent sits in exactly one cell, the
    /// cell matching its position, and every id on the grid is a live agent.
    pub fn verify(&self, grid: &SpatialGrid) -> Result<()> {
        let mut seen: BTreeMap<AgentId, Position> = BTreeMap::new();
        for (pos, ids) in grid.occupied() {
            for &id in ids {
                if let Some(other) = seen.insert(id, pos) {
                    return Err(SimError::inconsistent(format!(
                        "agent {id} listed at both {other} and {pos}"
                    )));
                }
            }
        }

        for (&id, &pos) in &seen {
            match self.agents.get(&id) {
                Some(agent) if agent.alive => {
                    if agent.position != pos {
                        return Err(SimError::inconsistent(format!(
                            "agent {id} records {} but the grid lists it at {pos}",
                            agent.position
                        )));
                    }
                }
                _ => {
                    return Err(SimError::inconsistent(format!(
                        "grid lists {id} at {pos} but it is not a live agent"
                    )));
                }
            }
        }

        for agent in self.agents.values().filter(|a| a.alive) {
            if !seen.contains_key(&agent.id) {
                return Err(SimError::inconsistent(format!(
                    "live agent {} is missing from the grid",
                    agent.id
                )));
            }
        }
        Ok(())
    }
}
