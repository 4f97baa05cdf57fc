use glam::Vec2;

use crate::organisms::genetics::Genes;

/// World-assigned identity. Allocated from a monotonically increasing counter and never reused
/// within one world lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Zoop,
    Plant,
}

/// A mobile grazer. Senses plants, moves along its intent, eats, and splits when well fed.
#[derive(Debug, Clone)]
pub struct Zoop {
    id: EntityId,
    birth_tick: u64,
    parent: Option<EntityId>,
    alive: bool,

    pub position: Vec2,
    /// Always within `[0, max_energy]`.
    pub energy: f32,
    pub genes: Genes,
    /// Written by the brain pass, consumed by movement.
    pub intent: Vec2,
    /// Seconds until this zoop may reproduce again.
    pub repro_cooldown: f32,
}

impl Zoop {
    /// Founders start heading along +x so they move before anything is sensed.
    pub const DEFAULT_INTENT: Vec2 = Vec2::new(1.0, 0.0);

    pub fn new(
        id: EntityId,
        birth_tick: u64,
        parent: Option<EntityId>,
        position: Vec2,
        energy: f32,
        genes: Genes,
    ) -> Self {
        Self {
            id,
            birth_tick,
            parent,
            alive: true,
            position,
            energy,
            genes,
            intent: Self::DEFAULT_INTENT,
            repro_cooldown: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn birth_tick(&self) -> u64 {
        self.birth_tick
    }

    /// `None` for founders.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_founder(&self) -> bool {
        self.parent.is_none()
    }

    pub fn can_reproduce(&self) -> bool {
        self.alive && self.repro_cooldown <= 0.0 && self.energy >= self.genes.repro_threshold
    }

    /// One-way transition. A dead zoop keeps its position and holds no intent.
    pub fn kill(&mut self) {
        self.alive = false;
        self.intent = Vec2::ZERO;
    }

    pub fn energy_ratio(&self, max_energy: f32) -> f32 {
        if max_energy > 0.0 {
            (self.energy / max_energy).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.repro_cooldown > 0.0 {
            self.repro_cooldown = (self.repro_cooldown - dt).max(0.0);
        }
    }
}
