//! # Crafted HTTP - Entry Point
//! src/main.rs
//!
//! Parsea la CLI, inicializa el logging, abre el puerto 4221 y atiende
//! conexiones hasta recibir SIGINT/SIGTERM.

use anyhow::{anyhow, Context};
use crafted_http::config::Config;
use crafted_http::logging;
use crafted_http::server::{Server, ShutdownHandle};
use tracing::info;

fn main() -> anyhow::Result<()> {
    logging::init().map_err(|e| anyhow!(e)).context("Failed to initialize logging")?;

    let config = Config::new();
    config.validate().map_err(|e| anyhow!(e)).context("Invalid configuration")?;

    info!(directory = %config.directory.display(), "starting server");

    let server = Server::new(&config).with_context(|| format!("Failed to bind {}", config.address()))?;
    install_signal_handlers(server.shutdown_handle())?;

    server.run().context("Accept loop failed")?;
    Ok(())
}

/// SIGINT / SIGTERM detienen el loop de aceptación
#[cfg(unix)]
fn install_signal_handlers(handle: ShutdownHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;

    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!(signal, "shutdown requested");
            handle.shutdown();
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn install_signal_handlers(_handle: ShutdownHandle) -> anyhow::Result<()> {
    Ok(())
}
