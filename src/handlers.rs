//! # Handlers de las Rutas
//! src/handlers.rs
//!
//! Cada handler recibe el contexto de la ruta (request, segmento capturado
//! y el store de archivos) y retorna una Response. Ningún handler falla:
//! los errores se traducen a códigos de estado.

use crate::files::StoreError;
use crate::http::{encoding, Response, StatusCode};
use crate::router::RouteContext;
use tracing::{debug, error, warn};

/// GET / → 200 sin body
pub fn root_handler(_ctx: &RouteContext<'_>) -> Response {
    Response::new(StatusCode::Ok)
}

/// GET /user-agent → 200 con el valor del header `User-Agent`
///
/// Sin el header la petición es inválida (400).
pub fn user_agent_handler(ctx: &RouteContext<'_>) -> Response {
    match ctx.request.header("user-agent") {
        Some(agent) => Response::text(agent),
        None => Response::new(StatusCode::BadRequest)
            .with_header("Content-Type", "text/plain")
            .with_body("Missing User-Agent header"),
    }
}

/// GET /echo/{texto} → 200 con el texto, comprimido si el cliente acepta gzip
pub fn echo_handler(ctx: &RouteContext<'_>) -> Response {
    let response = Response::text(ctx.capture);

    match encoding::negotiate(ctx.request, response) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "gzip compression failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

/// GET /files/{nombre} → 200 con los bytes exactos del archivo, o 404
pub fn read_file_handler(ctx: &RouteContext<'_>) -> Response {
    match ctx.store.read(ctx.capture) {
        Ok(bytes) => {
            debug!(file = ctx.capture, size = bytes.len(), "serving file");
            Response::new(StatusCode::Ok)
                .with_header("Content-Type", "application/octet-stream")
                .with_body_bytes(bytes)
        }
        Err(StoreError::NotFound) => Response::new(StatusCode::NotFound),
        Err(StoreError::InvalidName(name)) => {
            warn!(file = %name, "rejected file name");
            Response::new(StatusCode::BadRequest)
        }
        Err(e) => {
            error!(file = ctx.capture, error = %e, "file read failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

/// POST /files/{nombre} → escribe el body tal cual; 201 si sale bien, 500 si falla
pub fn write_file_handler(ctx: &RouteContext<'_>) -> Response {
    let body = ctx.request.body();

    match ctx.store.write(ctx.capture, body) {
        Ok(()) => {
            debug!(file = ctx.capture, size = body.len(), "file stored");
            Response::new(StatusCode::Created)
        }
        Err(StoreError::InvalidName(name)) => {
            warn!(file = %name, "rejected file name");
            Response::new(StatusCode::BadRequest)
        }
        Err(e) => {
            error!(file = ctx.capture, error = %e, "file write failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileStore;
    use crate::http::Request;
    use tempfile::TempDir;

    fn context_for<'a>(request: &'a Request, capture: &'a str, store: &'a FileStore) -> RouteContext<'a> {
        RouteContext {
            request,
            capture,
            store,
        }
    }

    #[test]
    fn test_root_handler_empty_body() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET / HTTP/1.1\r\nX-Anything: 1\r\n\r\n").unwrap();

        let response = root_handler(&context_for(&request, "", &store));
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_user_agent_handler() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /user-agent HTTP/1.1\r\nuser-agent: foo/1.0\r\n\r\n").unwrap();

        let response = user_agent_handler(&context_for(&request, "", &store));
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"foo/1.0");
    }

    #[test]
    fn test_user_agent_missing_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /user-agent HTTP/1.1\r\n\r\n").unwrap();

        let response = user_agent_handler(&context_for(&request, "", &store));
        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_echo_handler_plain() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /echo/hello HTTP/1.1\r\n\r\n").unwrap();

        let response = echo_handler(&context_for(&request, "hello", &store));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Content-Encoding"), None);
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn test_echo_handler_gzip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /echo/hello HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n").unwrap();

        let response = echo_handler(&context_for(&request, "hello", &store));
        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_ne!(response.body(), b"hello");
    }

    #[test]
    fn test_file_handlers_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let post = Request::parse(b"POST /files/report.txt HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world").unwrap();
        let created = write_file_handler(&context_for(&post, "report.txt", &store));
        assert_eq!(created.status(), StatusCode::Created);
        assert!(created.body().is_empty());

        let get = Request::parse(b"GET /files/report.txt HTTP/1.1\r\n\r\n").unwrap();
        let response = read_file_handler(&context_for(&get, "report.txt", &store));
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(response.body(), b"hello world");
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /files/missing.txt HTTP/1.1\r\n\r\n").unwrap();

        let response = read_file_handler(&context_for(&request, "missing.txt", &store));
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_write_failure_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("gone"));
        let request = Request::parse(b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 1\r\n\r\nx").unwrap();

        let response = write_file_handler(&context_for(&request, "a.txt", &store));
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn test_traversal_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let request = Request::parse(b"GET /files/.. HTTP/1.1\r\n\r\n").unwrap();

        let response = read_file_handler(&context_for(&request, "..", &store));
        assert_eq!(response.status(), StatusCode::BadRequest);
    }
}
