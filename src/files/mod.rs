//! # Almacenamiento de Archivos
//!
//! Adaptador de lectura/escritura de archivos bajo el directorio raíz
//! configurado, usado por las rutas `/files/<nombre>`.
//!
//! Los nombres se tratan como archivos planos dentro de la raíz: no se
//! aceptan separadores de path ni `..`.

pub mod store;

pub use store::{FileStore, StoreError};
