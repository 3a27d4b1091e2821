//! Block events.
//!
//! Events carry positions, never materials: handlers read the live material
//! from the world they are dispatched against.

use sponge_utils::BlockPos;

use super::{Cancellable, Event, Player};

/// A player placed a block. Fired after the block is in the world.
#[derive(Debug, Clone)]
pub struct BlockPlaceEvent {
    /// Where the block was placed.
    pub pos: BlockPos,
    /// Who placed it.
    pub player: Player,
    cancelled: bool,
}

impl BlockPlaceEvent {
    /// Creates an uncancelled place event.
    #[must_use]
    pub fn new(pos: BlockPos, player: Player) -> Self {
        Self {
            pos,
            player,
            cancelled: false,
        }
    }
}

impl Event for BlockPlaceEvent {
    const NAME: &'static str = "BlockPlaceEvent";

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Cancellable for BlockPlaceEvent {
    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A liquid is about to flow from one block into another.
#[derive(Debug, Clone)]
pub struct BlockFromToEvent {
    /// The block the liquid flows out of.
    pub from: BlockPos,
    /// The block the liquid flows into.
    pub to: BlockPos,
    cancelled: bool,
}

impl BlockFromToEvent {
    /// Creates an uncancelled flow event.
    #[must_use]
    pub fn new(from: BlockPos, to: BlockPos) -> Self {
        Self {
            from,
            to,
            cancelled: false,
        }
    }
}

impl Event for BlockFromToEvent {
    const NAME: &'static str = "BlockFromToEvent";

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Cancellable for BlockFromToEvent {
    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A player started damaging a block.
#[derive(Debug, Clone)]
pub struct BlockDamageEvent {
    /// The block being damaged.
    pub pos: BlockPos,
    /// The player damaging it.
    pub player: Player,
    instant_break: bool,
    cancelled: bool,
}

impl BlockDamageEvent {
    /// Creates an uncancelled damage event that does not break instantly.
    #[must_use]
    pub fn new(pos: BlockPos, player: Player) -> Self {
        Self {
            pos,
            player,
            instant_break: false,
            cancelled: false,
        }
    }

    /// Whether the block should break right away.
    #[must_use]
    pub fn instant_break(&self) -> bool {
        self.instant_break
    }

    /// Makes the block break right away instead of accumulating damage.
    pub fn set_instant_break(&mut self, instant_break: bool) {
        self.instant_break = instant_break;
    }
}

impl Event for BlockDamageEvent {
    const NAME: &'static str = "BlockDamageEvent";

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Cancellable for BlockDamageEvent {
    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
