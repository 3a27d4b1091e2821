use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sponge::SpongeServer;
use sponge_core::{RamWorld, SpongeConfig, SpongePlugin};
use sponge_utils::{SystemClock, logger};

const CONFIG_PATH: &str = "config/sponge_config.json5";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init().context("failed to initialize logging")?;

    let config = SpongeConfig::load_or_create(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;

    let server = SpongeServer::new(config.clone(), Arc::new(RamWorld::new()));
    server.register_plugin(Arc::new(SpongePlugin::new(config, Arc::new(SystemClock))))?;
    server.start();

    let cancel_token = server.cancel_token.clone();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            log::info!("Received ctrl-c, shutting down");
        }
        () = cancel_token.cancelled() => {}
    }

    server.stop();
    Ok(())
}
