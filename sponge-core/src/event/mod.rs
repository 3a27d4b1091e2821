//! Event bus.
//!
//! Handlers are registered per event type with an [`EventPriority`]. On
//! dispatch they run from [`EventPriority::Lowest`] to
//! [`EventPriority::Monitor`], registration order breaking ties, so a
//! cancellation made by one handler is visible to every handler after it.

use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;

use crate::world::World;

mod block;
mod entity;

pub use block::{BlockDamageEvent, BlockFromToEvent, BlockPlaceEvent};
pub use entity::{DamageCause, Entity, EntityDamageEvent, Player, PlayerQuitEvent};

/// Something that can be dispatched through the [`EventBus`].
pub trait Event: Send + 'static {
    /// Human readable name, used in logs.
    const NAME: &'static str;

    /// Whether a handler has cancelled this event.
    ///
    /// Events that cannot be cancelled keep the default.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// An event whose outcome handlers can veto.
pub trait Cancellable: Event {
    /// Sets the cancelled flag.
    fn set_cancelled(&mut self, cancelled: bool);
}

/// Order in which handlers of one event run.
///
/// Declared from first to run to last to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EventPriority {
    /// Runs first.
    Lowest,
    /// Runs after `Lowest`.
    Low,
    /// The default tier.
    #[default]
    Normal,
    /// Runs after `Normal`.
    High,
    /// Runs after `High`.
    Highest,
    /// Runs last, once the outcome of the event is settled.
    Monitor,
}

/// A reaction to one type of event.
pub trait EventHandler<E: Event>: Send + Sync {
    /// Handles `event`, reading and writing blocks through `world`.
    fn handle(&self, event: &mut E, world: &dyn World);
}

impl<E, F> EventHandler<E> for F
where
    E: Event,
    F: Fn(&mut E, &dyn World) + Send + Sync,
{
    fn handle(&self, event: &mut E, world: &dyn World) {
        self(event, world);
    }
}

struct RegisteredHandler<E: Event> {
    priority: EventPriority,
    ignore_cancelled: bool,
    handler: Box<dyn EventHandler<E>>,
}

/// The ordered handlers of one event type.
struct HandlerList<E: Event> {
    handlers: Vec<RegisteredHandler<E>>,
}

impl<E: Event> HandlerList<E> {
    fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    fn insert(&mut self, registered: RegisteredHandler<E>) {
        // Stable: FIFO within one priority.
        let pos = self
            .handlers
            .iter()
            .position(|h| h.priority > registered.priority)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(pos, registered);
    }

    fn dispatch(&self, event: &mut E, world: &dyn World) {
        for registered in &self.handlers {
            if registered.ignore_cancelled && event.is_cancelled() {
                continue;
            }
            registered.handler.handle(event, world);
        }
    }
}

/// Routes events to their registered handlers.
///
/// Registration takes `&mut self` and dispatch `&self`; share a bus between
/// threads behind a read-write lock.
#[derive(Default)]
pub struct EventBus {
    lists: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of type `E`.
    ///
    /// With `ignore_cancelled` set the handler is skipped for events an
    /// earlier handler already cancelled.
    pub fn register<E, H>(&mut self, priority: EventPriority, ignore_cancelled: bool, handler: H)
    where
        E: Event,
        H: EventHandler<E> + 'static,
    {
        log::debug!("Registering {} handler at {priority:?}", E::NAME);

        let list = self
            .lists
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(HandlerList::<E>::new()));

        if let Some(list) = list.downcast_mut::<HandlerList<E>>() {
            list.insert(RegisteredHandler {
                priority,
                ignore_cancelled,
                handler: Box::new(handler),
            });
        }
    }

    /// Runs every handler registered for `E` against `event`.
    pub fn dispatch<E: Event>(&self, event: &mut E, world: &dyn World) {
        if let Some(list) = self.list::<E>() {
            list.dispatch(event, world);
        }
    }

    /// Number of handlers registered for `E`.
    #[must_use]
    pub fn handler_count<E: Event>(&self) -> usize {
        self.list::<E>().map_or(0, |list| list.handlers.len())
    }

    /// Unregisters every handler.
    pub fn clear(&mut self) {
        self.lists.clear();
    }

    fn list<E: Event>(&self) -> Option<&HandlerList<E>> {
        self.lists
            .get(&TypeId::of::<E>())
            .and_then(|list| list.downcast_ref::<HandlerList<E>>())
    }
}
