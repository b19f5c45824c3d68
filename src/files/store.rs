//! # File Store
//! src/files/store.rs
//!
//! Lee y escribe archivos dentro de un directorio raíz.
//!
//! Las escrituras son atómicas: el contenido va primero a un archivo
//! temporal en el mismo directorio y después se renombra sobre el destino.
//! Dos POST concurrentes al mismo nombre terminan en "gana el último" y un
//! GET nunca ve un archivo a medio escribir.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Errores del almacenamiento de archivos
#[derive(Debug)]
pub enum StoreError {
    /// El archivo no existe o no es un archivo regular
    NotFound,

    /// El nombre intenta salir del directorio raíz
    InvalidName(String),

    /// Falla de I/O (permisos, disco lleno, ...)
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "File not found"),
            StoreError::InvalidName(name) => write!(f, "Invalid filename: {}", name),
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound
        } else {
            StoreError::Io(e)
        }
    }
}

/// Acceso a archivos bajo un directorio raíz
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Crea un store sobre el directorio dado
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resuelve un nombre plano dentro de la raíz
    ///
    /// Rechaza nombres vacíos, `.`, `..`, con separadores o con NUL.
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);

        if invalid {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        Ok(self.root.join(name))
    }

    /// Lee el contenido completo de un archivo
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::files::{FileStore, StoreError};
    ///
    /// let store = FileStore::new(std::env::temp_dir());
    /// assert!(matches!(store.read("../etc/passwd"), Err(StoreError::InvalidName(_))));
    /// ```
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name)?;

        if !fs::metadata(&path)?.is_file() {
            return Err(StoreError::NotFound);
        }

        Ok(fs::read(&path)?)
    }

    /// Escribe (crea o reemplaza) un archivo con los bytes dados
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name)?;

        // Archivo temporal en el mismo directorio para que el rename sea atómico
        let mut temp = NamedTempFile::new_in(&self.root).map_err(StoreError::Io)?;
        temp.write_all(bytes).map_err(StoreError::Io)?;
        temp.flush().map_err(StoreError::Io)?;
        temp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_write_then_read() {
        let (_dir, store) = store();
        store.write("report.txt", b"hello world").unwrap();

        assert_eq!(store.read("report.txt").unwrap(), b"hello world");
    }

    #[test]
    fn test_write_overwrites() {
        let (_dir, store) = store();
        store.write("a.txt", b"a much longer first version").unwrap();
        store.write("a.txt", b"short").unwrap();

        assert_eq!(store.read("a.txt").unwrap(), b"short");
    }

    #[test]
    fn test_write_binary() {
        let (_dir, store) = store();
        let data = vec![0x00, 0xFF, 0x0D, 0x0A, 0x7F];
        store.write("blob.bin", &data).unwrap();

        assert_eq!(store.read("blob.bin").unwrap(), data);
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let (dir, store) = store();
        store.write("only.txt", b"x").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_concurrent_writes_last_writer_wins() {
        let (dir, store) = store();

        let writers: Vec<_> = (0..16u8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let body = vec![b'a' + i; 1000];
                    store.write("same", &body).unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let content = store.read("same").unwrap();
        assert_eq!(content.len(), 1000);
        assert!(content.iter().all(|b| *b == content[0]));

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let (_dir, store) = store();
        assert!(matches!(store.read("missing.txt"), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_read_directory_is_not_found() {
        let (dir, store) = store();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        assert!(matches!(store.read("subdir"), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_rejects_traversal() {
        let (_dir, store) = store();

        for name in ["..", ".", "", "../secret", "a/b", "a\\b"] {
            assert!(
                matches!(store.read(name), Err(StoreError::InvalidName(_))),
                "read should reject {:?}",
                name
            );
            assert!(
                matches!(store.write(name, b"x"), Err(StoreError::InvalidName(_))),
                "write should reject {:?}",
                name
            );
        }
    }

    #[test]
    fn test_write_into_missing_root_fails() {
        let (dir, _) = store();
        let store = FileStore::new(dir.path().join("does-not-exist"));

        assert!(matches!(store.write("a.txt", b"x"), Err(StoreError::Io(_))));
    }
}
