//! # Sponge
//!
//! A headless host for the sponge plugin: owns the world, the event bus and
//! the registered plugins, and dispatches events against them.
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use sponge_core::{EventBus, Plugin, SpongeConfig, World, event::Event};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Plugin registration and lifecycle.
pub mod plugin;

pub use plugin::PluginManager;

/// Errors raised by the host.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A plugin with the same name is already registered.
    #[error("a plugin named '{0}' is already registered")]
    DuplicatePlugin(String),
}

/// The main server struct.
pub struct SpongeServer {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    config: SpongeConfig,
    world: Arc<dyn World>,
    bus: RwLock<EventBus>,
    plugins: Mutex<PluginManager>,
}

impl SpongeServer {
    /// Creates a server around `world`. No plugin is registered yet.
    #[must_use]
    pub fn new(config: SpongeConfig, world: Arc<dyn World>) -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            config,
            world,
            bus: RwLock::new(EventBus::new()),
            plugins: Mutex::new(PluginManager::new()),
        }
    }

    /// Registers a plugin. It is enabled on the next [`SpongeServer::start`].
    pub fn register_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<(), ServerError> {
        self.plugins.lock().register(plugin)
    }

    /// Enables every registered plugin.
    pub fn start(&self) {
        log::info!("Starting Sponge Server");

        log::info!(
            "Sponge radius {}, fall immunity {} ms",
            self.config.radius,
            self.config.invulnerability_millis
        );

        let mut plugins = self.plugins.lock();
        if plugins.is_empty() {
            log::warn!("No plugins registered");
        }
        plugins.enable_all(&mut self.bus.write());

        let names: Vec<&str> = plugins.metadata().map(|m| m.name.as_str()).collect();
        log::info!(
            "Started Sponge Server with {}/{} plugin(s) enabled: {}",
            plugins.enabled_count(),
            plugins.len(),
            names.join(", ")
        );
    }

    /// Disables every plugin, drops their handlers and signals shutdown.
    pub fn stop(&self) {
        self.plugins.lock().disable_all();
        self.bus.write().clear();
        self.cancel_token.cancel();
        log::info!("Stopped Sponge Server");
    }

    /// Dispatches `event` to every handler against this server's world.
    pub fn dispatch<E: Event>(&self, event: &mut E) {
        self.bus.read().dispatch(event, self.world.as_ref());
    }

    /// The world events are dispatched against.
    #[must_use]
    pub fn world(&self) -> &Arc<dyn World> {
        &self.world
    }
}
