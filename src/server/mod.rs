//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en `127.0.0.1:4221`
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea un request HTTP
//! 4. Genera y envía la response y cierra la conexión

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{Server, ShutdownHandle};
