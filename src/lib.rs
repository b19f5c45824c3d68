//! # Crafted HTTP
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo construido directamente sobre sockets TCP,
//! sin librerías HTTP: el parsing, el routing y la serialización de
//! respuestas están hechos a mano.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, construcción de responses, códigos de
//!   estado y negociación gzip
//! - `router`: Tabla fija de rutas (exactas y por prefijo)
//! - `handlers`: Lógica de cada ruta
//! - `files`: Lectura/escritura de archivos bajo el directorio raíz
//! - `server`: Listener TCP, un thread por conexión
//! - `config`: Argumentos CLI
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use crafted_http::config::Config;
//! use crafted_http::server::Server;
//!
//! let config = Config::default();
//! let server = Server::new(&config).expect("No se pudo abrir el puerto");
//! server.run().expect("Error en el loop de aceptación");
//! ```

pub mod config;
pub mod files;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
