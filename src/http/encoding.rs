//! # Negociación de Content-Encoding
//! src/http/encoding.rs
//!
//! Si el cliente anuncia `gzip` en `Accept-Encoding`, el body de la
//! respuesta se comprime y se agrega `Content-Encoding: gzip`.
//! Solo se reconoce el token literal `gzip` (sin comodines ni `q=`).

use super::{Request, Response};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Único esquema de compresión soportado
pub const GZIP: &str = "gzip";

/// Verifica si el request acepta gzip
///
/// # Ejemplo
/// ```
/// use crafted_http::http::{encoding, Request};
///
/// let raw = b"GET /echo/a HTTP/1.1\r\nAccept-Encoding: br, gzip\r\n\r\n";
/// let request = Request::parse(raw).unwrap();
/// assert!(encoding::accepts_gzip(&request));
/// ```
pub fn accepts_gzip(request: &Request) -> bool {
    request
        .header("accept-encoding")
        .map(|value| value.split(',').any(|token| token.trim() == GZIP))
        .unwrap_or(false)
}

/// Comprime bytes con gzip
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Aplica la negociación a una respuesta ya construida
///
/// Sin `gzip` aceptado la respuesta se devuelve intacta.
pub fn negotiate(request: &Request, mut response: Response) -> std::io::Result<Response> {
    if !accepts_gzip(request) {
        return Ok(response);
    }

    let compressed = gzip(response.body())?;
    response.set_body(compressed);
    response.add_header("Content-Encoding", GZIP);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn request_with(accept: Option<&str>) -> Request {
        let raw = match accept {
            Some(value) => format!("GET /echo/abc HTTP/1.1\r\nAccept-Encoding: {}\r\n\r\n", value),
            None => "GET /echo/abc HTTP/1.1\r\n\r\n".to_string(),
        };
        Request::parse(raw.as_bytes()).unwrap()
    }

    fn gunzip(data: &[u8]) -> Vec<u8> {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_accepts_gzip_single_token() {
        assert!(accepts_gzip(&request_with(Some("gzip"))));
    }

    #[test]
    fn test_accepts_gzip_in_list() {
        assert!(accepts_gzip(&request_with(Some("invalid-encoding-1, gzip, invalid-encoding-2"))));
    }

    #[test]
    fn test_rejects_other_encodings() {
        assert!(!accepts_gzip(&request_with(Some("deflate, br"))));
        assert!(!accepts_gzip(&request_with(Some("gzipped"))));
        assert!(!accepts_gzip(&request_with(None)));
    }

    #[test]
    fn test_negotiate_compresses_body() {
        let request = request_with(Some("gzip"));
        let response = negotiate(&request, Response::text("abc")).unwrap();

        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_eq!(gunzip(response.body()), b"abc");
        assert!(String::from_utf8_lossy(&response.to_bytes())
            .contains(&format!("Content-Length: {}\r\n", response.body().len())));
    }

    #[test]
    fn test_negotiate_without_gzip_is_identity() {
        let request = request_with(Some("deflate"));
        let response = negotiate(&request, Response::text("abc")).unwrap();

        assert_eq!(response.header("Content-Encoding"), None);
        assert_eq!(response.body(), b"abc");
    }
}
