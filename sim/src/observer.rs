use crate::Agent;
use shared::{AgentId, AgentRecord, Position, SimEvent, Species};
use tracing::{debug, trace};

/// Receives simulation events as they happen; every method defaults to a no-op
pub trait Observer {
    fn on_activate(&mut self, _tick: u64, _id: AgentId, _species: Species) {}

    fn on_move(&mut self, _tick: u64, _id: AgentId, _from: Position, _to: Position) {}

    fn on_hunt(&mut self, _tick: u64, _predator: AgentId, _prey: AgentId, _at: Position) {}

    fn on_birth_queued(&mut self, _tick: u64, _parent: AgentId, _species: Species, _at: Position) {
    }

    fn on_death_queued(&mut self, _tick: u64, _id: AgentId) {}

    /// A queued birth was committed
    fn on_birth(&mut self, _tick: u64, _agent: &Agent) {}

    /// A queued death was committed
    fn on_death(&mut self, _tick: u64, _agent: &Agent) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_move(&mut self, tick: u64, id: AgentId, from: Position, to: Position) {
        trace!(tick, %id, %from, %to, "agent moved");
    }

    fn on_hunt(&mut self, tick: u64, predator: AgentId, prey: AgentId, at: Position) {
        debug!(tick, %predator, %prey, %at, "predator ate prey");
    }

    fn on_birth(&mut self, tick: u64, agent: &Agent) {
        debug!(tick, id = %agent.id, species = %agent.species, at = %agent.position, "agent born");
    }

    fn on_death(&mut self, tick: u64, agent: &Agent) {
        debug!(tick, id = %agent.id, species = %agent.species, at = %agent.position, "agent died");
    }
}

/// Records every event in order
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_tick(&self, tick: u64) -> impl Iterator<Item = &SimEvent> + '_ {
        self.events.iter().filter(move |e| e.tick() == tick)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Observer for EventLog {
    fn on_activate(&mut self, tick: u64, id: AgentId, species: Species) {
        self.events.push(SimEvent::Activated { tick, id, species });
    }

    fn on_move(&mut self, tick: u64, id: AgentId, from: Position, to: Position) {
        self.events.push(SimEvent::Moved { tick, id, from, to });
    }

    fn on_hunt(&mut self, tick: u64, predator: AgentId, prey: AgentId, at: Position) {
        self.events.push(SimEvent::Hunted {
            tick,
            predator,
            prey,
            position: at,
        });
    }

    fn on_birth_queued(&mut self, tick: u64, parent: AgentId, species: Species, at: Position) {
        self.events.push(SimEvent::BirthQueued {
            tick,
            parent,
            species,
            position: at,
        });
    }

    fn on_death_queued(&mut self, tick: u64, id: AgentId) {
        self.events.push(SimEvent::DeathQueued { tick, id });
    }

    fn on_birth(&mut self, tick: u64, agent: &Agent) {
        self.events.push(SimEvent::Born {
            tick,
            agent: AgentRecord::from(agent),
        });
    }

    fn on_death(&mut self, tick: u64, agent: &Agent) {
        self.events.push(SimEvent::Died {
            tick,
            agent: AgentRecord::from(agent),
        });
    }
}
