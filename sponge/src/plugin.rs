//! Plugin registration and lifecycle.

use std::sync::Arc;

use sponge_core::{EventBus, Plugin, PluginMetadata};

use crate::ServerError;

/// A registered plugin.
struct LoadedPlugin {
    metadata: PluginMetadata,
    plugin: Arc<dyn Plugin>,
    enabled: bool,
}

/// Manages registered plugins.
pub struct PluginManager {
    plugins: Vec<LoadedPlugin>,
}

impl PluginManager {
    /// Creates a new empty plugin manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin. Names must be unique.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), ServerError> {
        let metadata = plugin.metadata();
        if self.plugins.iter().any(|p| p.metadata.name == metadata.name) {
            return Err(ServerError::DuplicatePlugin(metadata.name));
        }

        log::info!(
            "Plugin '{}' v{}: {}",
            metadata.name,
            metadata.version,
            metadata.description
        );

        self.plugins.push(LoadedPlugin {
            metadata,
            plugin,
            enabled: false,
        });
        Ok(())
    }

    /// Enables every plugin that is not enabled yet, in registration order.
    pub fn enable_all(&mut self, bus: &mut EventBus) {
        for loaded in self.plugins.iter_mut().filter(|p| !p.enabled) {
            log::debug!("Enabling {}", loaded.metadata.name);
            loaded.plugin.on_enable(bus);
            loaded.enabled = true;
        }
    }

    /// Disables every enabled plugin, in reverse registration order.
    pub fn disable_all(&mut self) {
        for loaded in self.plugins.iter_mut().rev().filter(|p| p.enabled) {
            log::debug!("Disabling {}", loaded.metadata.name);
            loaded.plugin.on_disable();
            loaded.enabled = false;
        }
    }

    /// Metadata of every registered plugin.
    pub fn metadata(&self) -> impl Iterator<Item = &PluginMetadata> {
        self.plugins.iter().map(|p| &p.metadata)
    }

    /// Number of enabled plugins.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.plugins.iter().filter(|p| p.enabled).count()
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
