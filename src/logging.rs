//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing` con salida a stderr. El nivel se controla con
//! `RUST_LOG` (por defecto `info`), por ejemplo:
//!
//! ```bash
//! RUST_LOG=crafted_http=debug ./crafted_http --directory /tmp
//! ```

use tracing_subscriber::EnvFilter;

/// Nivel por defecto cuando `RUST_LOG` no está definido
const DEFAULT_FILTER: &str = "info";

/// Instala el subscriber global
///
/// Falla si ya había uno instalado (por ejemplo, al llamarla dos veces).
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .try_init()
}
