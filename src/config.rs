//! # Configuración del Servidor
//! src/config.rs
//!
//! La única opción es el directorio raíz de `/files/`. La dirección de
//! escucha es fija (`127.0.0.1:4221`).
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./crafted_http --directory /tmp/files
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_DIRECTORY=/tmp/files ./crafted_http
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Dirección fija en la que escucha el servidor
pub const LISTEN_ADDRESS: &str = "127.0.0.1:4221";

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "crafted_http")]
#[command(about = "Servidor HTTP/1.1 mínimo sobre sockets TCP")]
#[command(version)]
pub struct Config {
    /// Directorio donde se guardan/leen los archivos de /files/
    #[arg(long, default_value = ".", env = "HTTP_DIRECTORY")]
    pub directory: PathBuf,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección de escucha (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use crafted_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> &'static str {
        LISTEN_ADDRESS
    }

    /// Valida la configuración
    ///
    /// El directorio debe existir y ser un directorio.
    pub fn validate(&self) -> Result<(), String> {
        match std::fs::metadata(&self.directory) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!("{} is not a directory", self.directory.display())),
            Err(e) => Err(format!("Directory {} is not accessible: {}", self.directory.display(), e)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.directory, PathBuf::from("."));
    }

    #[test]
    fn test_address_is_fixed() {
        let mut config = Config::default();
        config.directory = PathBuf::from("/custom/path");
        assert_eq!(config.address(), "127.0.0.1:4221");
    }

    #[test]
    fn test_parse_directory_flag() {
        let config = Config::try_parse_from(["crafted_http", "--directory", "/tmp/files"]).unwrap();
        assert_eq!(config.directory, PathBuf::from("/tmp/files"));
    }

    #[test]
    fn test_port_is_not_an_option() {
        let result = Config::try_parse_from(["crafted_http", "--port", "8080"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_success() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            directory: dir.path().to_path_buf(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            directory: dir.path().join("missing"),
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("not accessible"));
    }

    #[test]
    fn test_validate_file_is_not_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        let config = Config { directory: file };
        assert!(config.validate().unwrap_err().contains("not a directory"));
    }
}
