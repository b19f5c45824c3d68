//! # Módulo HTTP
//!
//! Implementación del protocolo HTTP/1.1 desde cero, sin usar librerías
//! de alto nivel. Incluye:
//!
//! - Parsing de requests sobre bytes crudos
//! - Construcción y serialización de responses
//! - Códigos de estado
//! - Negociación de `Content-Encoding` (gzip)
//!
//! ## Alcance
//!
//! - Un request por conexión (sin keep-alive ni pipelining)
//! - Sin chunked transfer encoding
//! - Sin HTTP/2 ni TLS

pub mod encoding; // Negociación gzip
pub mod request; // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request, MAX_REQUEST_SIZE};
pub use response::Response;
pub use status::StatusCode;
