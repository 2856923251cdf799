use crate::{AgentId, AgentRecord, Position, Species};
use serde::{Deserialize, Serialize};

/// Something that happened during a tick, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// An agent from the tick's snapshot started its behavior
    Activated {
        tick: u64,
        id: AgentId,
        species: Species,
    },
    Moved {
        tick: u64,
        id: AgentId,
        from: Position,
        to: Position,
    },
    /// A predator picked a prey on its cell; the prey's death is queued
    Hunted {
        tick: u64,
        predator: AgentId,
        prey: AgentId,
        position: Position,
    },
    BirthQueued {
        tick: u64,
        parent: AgentId,
        species: Species,
        position: Position,
    },
    DeathQueued { tick: u64, id: AgentId },
    /// A queued birth was committed at tick end
    Born { tick: u64, agent: AgentRecord },
    /// A queued death was committed at tick end
    Died { tick: u64, agent: AgentRecord },
}

impl SimEvent {
    pub fn tick(&self) -> u64 {
        match self {
            SimEvent::Activated { tick, .. }
            | SimEvent::Moved { tick, .. }
            | SimEvent::Hunted { tick, .. }
            | SimEvent::BirthQueued { tick, .. }
            | SimEvent::DeathQueued { tick, .. }
            | SimEvent::Born { tick, .. }
            | SimEvent::Died { tick, .. } => *tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = SimEvent::Hunted {
            tick: 2,
            predator: AgentId(1),
            prey: AgentId(0),
            position: Position::new(1, 1),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "hunted");
        assert_eq!(json["prey"], 0);
        assert_eq!(event.tick(), 2);

        let decoded: SimEvent = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, event);
    }
}
