//! Entity and player events.

use uuid::Uuid;

use super::{Cancellable, Event};

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    /// Globally unique player id.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
}

impl Player {
    /// Creates a player handle.
    #[must_use]
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
        }
    }
}

/// An entity that can take damage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A player.
    Player(Player),
    /// Any other entity, identified by its network id.
    Other {
        /// The entity's network id.
        entity_id: i32,
    },
}

impl Entity {
    /// Returns the player if this entity is one.
    #[must_use]
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(player) => Some(player),
            Entity::Other { .. } => None,
        }
    }
}

/// Why an entity took damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCause {
    /// Landing after a fall.
    Fall,
    /// Standing in fire.
    Fire,
    /// Touching lava.
    Lava,
    /// Running out of air.
    Drowning,
    /// Stuck inside a block.
    Suffocation,
    /// Hit by another entity.
    EntityAttack,
    /// Below the world.
    Void,
    /// Anything a host does not classify.
    Custom,
}

/// An entity is about to take damage.
#[derive(Debug, Clone)]
pub struct EntityDamageEvent {
    /// The damaged entity.
    pub entity: Entity,
    /// The cause, if the host knows it.
    pub cause: Option<DamageCause>,
    /// Damage amount in half hearts.
    pub damage: f32,
    cancelled: bool,
}

impl EntityDamageEvent {
    /// Creates an uncancelled damage event.
    #[must_use]
    pub fn new(entity: Entity, cause: Option<DamageCause>, damage: f32) -> Self {
        Self {
            entity,
            cause,
            damage,
            cancelled: false,
        }
    }
}

impl Event for EntityDamageEvent {
    const NAME: &'static str = "EntityDamageEvent";

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Cancellable for EntityDamageEvent {
    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A player disconnected. Not cancellable.
#[derive(Debug, Clone)]
pub struct PlayerQuitEvent {
    /// The player that left.
    pub player: Player,
}

impl PlayerQuitEvent {
    /// Creates a quit event.
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self { player }
    }
}

impl Event for PlayerQuitEvent {
    const NAME: &'static str = "PlayerQuitEvent";
}
