use crate::error::Result;
use crate::grid::SpatialGrid;
use crate::observer::Observer;
use crate::population::Population;
use crate::random::RandomSource;
use shared::{AgentId, AgentRecord, Parameters, Position, Species};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub position: Position,
    pub alive: bool,
}

impl Agent {
    pub fn new(id: AgentId, species: Species, position: Position) -> Self {
        Self {
            id,
            species,
            position,
            alive: true,
        }
    }
}

impl From<&Agent> for AgentRecord {
    fn from(agent: &Agent) -> Self {
        AgentRecord {
            id: agent.id,
            species: agent.species,
            position: agent.position,
            alive: agent.alive,
        }
    }
}

impl From<&AgentRecord> for Agent {
    fn from(record: &AgentRecord) -> Self {
        Agent {
            id: record.id,
            species: record.species,
            position: record.position,
            alive: record.alive,
        }
    }
}

/// Everything a single activation may read or write
pub struct Activation<'a> {
    pub tick: u64,
    pub grid: &'a mut SpatialGrid,
    pub population: &'a mut Population,
    pub rng: &'a mut RandomSource,
    pub params: &'a Parameters,
    pub observer: &'a mut dyn Observer,
}

impl Activation<'_> {
    fn position_of(&self, id: AgentId) -> Result<Position> {
        Ok(self.population.require(id)?.position)
    }

    fn neighbors(&self, pos: Position) -> Result<Vec<Position>> {
        self.grid
            .neighborhood(pos, self.params.neighborhood_radius, false)
    }

    /// Step to a uniformly chosen neighboring cell; stay put if there is none
    fn random_move(&mut self, id: AgentId) -> Result<Position> {
        let from = self.position_of(id)?;
        let cells = self.neighbors(from)?;
        if cells.is_empty() {
            return Ok(from);
        }

        let to = *self.rng.choose_one(&cells)?;
        self.population.relocate(self.grid, id, to)?;
        self.observer.on_move(self.tick, id, from, to);
        Ok(to)
    }

    /// Queue an offspring on a uniformly chosen neighboring cell.
    /// Occupied cells are not filtered out.
    fn reproduce(&mut self, parent: AgentId, species: Species, at: Position) -> Result<()> {
        let cells = self.neighbors(at)?;
        if cells.is_empty() {
            return Ok(());
        }

        let spot = *self.rng.choose_one(&cells)?;
        self.population.queue_birth(species, spot);
        self.observer
            .on_birth_queued(self.tick, parent, species, spot);
        Ok(())
    }

    fn kill(&mut self, id: AgentId) -> Result<()> {
        self.population.queue_death(id)?;
        self.observer.on_death_queued(self.tick, id);
        Ok(())
    }
}

/// Per-species behavior, run once per activation
pub trait Behavior {
    fn act(&self, id: AgentId, ctx: &mut Activation<'_>) -> Result<()>;
}

impl Behavior for Species {
    fn act(&self, id: AgentId, ctx: &mut Activation<'_>) -> Result<()> {
        match self {
            Species::Prey => prey_step(id, ctx),
            Species::Predator => predator_step(id, ctx),
        }
    }
}

/// Move, then maybe reproduce
fn prey_step(id: AgentId, ctx: &mut Activation<'_>) -> Result<()> {
    // 1. Random walk
    let pos = ctx.random_move(id)?;

    // 2. Reproduction, placed around the post-move cell
    if ctx.rng.chance(ctx.params.prey_reproduction_chance)? {
        ctx.reproduce(id, Species::Prey, pos)?;
    }

    Ok(())
}

/// Move, eat a prey on the new cell, reproduce after a meal, then maybe die
fn predator_step(id: AgentId, ctx: &mut Activation<'_>) -> Result<()> {
    // 1. Random walk
    let pos = ctx.random_move(id)?;

    // 2. Hunt among live prey on this cell
    let prey_here: Vec<AgentId> = ctx
        .grid
        .occupants(pos)?
        .iter()
        .copied()
        .filter(|&other| {
            ctx.population
                .get(other)
                .is_some_and(|a| a.alive && a.species == Species::Prey)
        })
        .collect();

    if !prey_here.is_empty() {
        let victim = *ctx.rng.choose_one(&prey_here)?;
        ctx.observer.on_hunt(ctx.tick, id, victim, pos);
        ctx.kill(victim)?;

        // 3. Only a fed predator reproduces
        ctx.reproduce(id, Species::Predator, pos)?;
    }

    // 4. Natural death
    if ctx.rng.chance(ctx.params.predator_death_chance)? {
        ctx.kill(id)?;
    }

    Ok(())
}
