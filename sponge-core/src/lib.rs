//! # Sponge Core
//!
//! The sponge rules and everything they need to run without a game server:
//! the [`world::World`] capability, the [`event::EventBus`], the
//! [`invulnerability::InvulnerabilityTable`] and the plugin lifecycle.

/// Config file loading.
pub mod config;
pub mod event;
pub mod invulnerability;
pub mod plugin;
pub mod sponge;
pub mod world;

pub use config::SpongeConfig;
pub use event::EventBus;
pub use plugin::{Plugin, PluginMetadata, SpongePlugin};
pub use sponge::SpongeListener;
pub use world::{RamWorld, World};
