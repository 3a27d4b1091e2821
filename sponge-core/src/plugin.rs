//! Plugin lifecycle.
//!
//! A plugin hooks its listeners into the bus when enabled and drops whatever
//! in-memory state it holds when disabled.

use std::sync::Arc;

use sponge_utils::Clock;

use crate::config::SpongeConfig;
use crate::event::EventBus;
use crate::invulnerability::InvulnerabilityTable;
use crate::sponge::SpongeListener;

/// Plugin metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    /// The name of the plugin.
    pub name: String,
    /// The version of the plugin.
    pub version: String,
    /// A description of the plugin.
    pub description: String,
}

/// Something a host can enable and disable.
pub trait Plugin: Send + Sync {
    /// Returns the plugin metadata.
    fn metadata(&self) -> PluginMetadata;

    /// Registers the plugin's handlers.
    fn on_enable(&self, bus: &mut EventBus);

    /// Called once the host stops dispatching to this plugin.
    fn on_disable(&self) {}
}

/// The sponge plugin.
pub struct SpongePlugin {
    listener: Arc<SpongeListener>,
}

impl SpongePlugin {
    /// Creates the plugin with an empty grant table.
    #[must_use]
    pub fn new(config: SpongeConfig, clock: Arc<dyn Clock>) -> Self {
        let listener = SpongeListener::new(config, clock, Arc::new(InvulnerabilityTable::new()));
        Self {
            listener: Arc::new(listener),
        }
    }

    /// The listener backing this plugin.
    #[must_use]
    pub fn listener(&self) -> &Arc<SpongeListener> {
        &self.listener
    }
}

impl Plugin for SpongePlugin {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: String::from("Sponge"),
            version: String::from(env!("CARGO_PKG_VERSION")),
            description: String::from(
                "Sponges soak up nearby liquids and soften the fall of whoever breaks them",
            ),
        }
    }

    fn on_enable(&self, bus: &mut EventBus) {
        self.listener.register(bus);
        log::info!("Plugin has been enabled!");
    }

    fn on_disable(&self) {
        self.listener.invulnerable().clear();
        log::info!("Plugin has been disabled!");
    }
}
