use bevy::prelude::*;

use crate::organisms::{EntityId, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimEventType {
    EntityBorn,
    EntityDied,
    WorldRebuilt,
    TickAdvanced,
}

/// Something observable that happened inside the world.
///
/// `entity` is `None` for world-scoped events (`WorldRebuilt`, `TickAdvanced`).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimEvent {
    pub event_type: SimEventType,
    pub tick: u64,
    pub entity: Option<(EntityId, EntityKind)>,
}

impl SimEvent {
    pub fn born(tick: u64, id: EntityId, kind: EntityKind) -> Self {
        Self {
            event_type: SimEventType::EntityBorn,
            tick,
            entity: Some((id, kind)),
        }
    }

    pub fn died(tick: u64, id: EntityId, kind: EntityKind) -> Self {
        Self {
            event_type: SimEventType::EntityDied,
            tick,
            entity: Some((id, kind)),
        }
    }

    pub fn rebuilt(tick: u64) -> Self {
        Self {
            event_type: SimEventType::WorldRebuilt,
            tick,
            entity: None,
        }
    }

    pub fn tick_advanced(tick: u64) -> Self {
        Self {
            event_type: SimEventType::TickAdvanced,
            tick,
            entity: None,
        }
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity.map(|(id, _)| id)
    }

    pub fn kind(&self) -> Option<EntityKind> {
        self.entity.map(|(_, kind)| kind)
    }
}

/// Append-only buffer of events in emission order, drained by whoever drives the world.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<SimEvent>,
}

impl EventBuffer {
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
