//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP/1.1 escrito desde cero sobre slices de bytes.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/report.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 11\r\n
//! \r\n
//! hello world
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path VERSION` (separados por un espacio)
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: bytes crudos; largo dado por `Content-Length` o el resto del buffer

use std::collections::HashMap;

/// Tamaño máximo del buffer de lectura de un request (64 KiB)
pub const MAX_REQUEST_SIZE: usize = 64 * 1024;

const CRLF: &[u8] = b"\r\n";
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP
///
/// Solo GET y POST tienen rutas; cualquier otro token se conserva tal cual
/// para poder responder 405 o 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Método no reconocido (DELETE, PUT, "get" en minúsculas, ...)
    Other(String),
}

impl Method {
    /// Parsea un método HTTP. La comparación distingue mayúsculas.
    fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(m) => m,
        }
    }
}

/// Representa un request HTTP/1.1 parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path crudo, con el `/` inicial y sin decodificar
    path: String,

    /// Versión del protocolo (ej: "HTTP/1.1")
    version: String,

    /// Headers con el nombre en minúsculas; el último duplicado gana
    headers: HashMap<String, String>,

    /// Body del request (binario)
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// La request line no tiene exactamente tres tokens
    MalformedRequestLine,

    /// Línea de header sin `": "` o `Content-Length` inválido
    MalformedHeaderLine(String),

    /// Faltan bytes: no llegó la línea vacía o el body está truncado
    IncompleteRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MalformedRequestLine => write!(f, "Malformed request line"),
            ParseError::MalformedHeaderLine(h) => write!(f, "Malformed header line: {}", h),
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Busca la primera aparición de `needle` dentro de `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl Request {
    /// Parsea un request HTTP/1.1 desde bytes
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError::IncompleteRequest)` - Hay que leer más bytes del socket
    /// * `Err(_)` - Request malformado
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use crafted_http::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let head_end = match find(buffer, HEAD_TERMINATOR) {
            Some(pos) => pos,
            None => {
                // Si la request line ya llegó completa, validarla antes de
                // pedir más bytes: un request basura no debe quedarse esperando.
                if let Some(line_end) = find(buffer, CRLF) {
                    let line = std::str::from_utf8(&buffer[..line_end])
                        .map_err(|_| ParseError::MalformedRequestLine)?;
                    Self::parse_request_line(line)?;
                }
                return Err(ParseError::IncompleteRequest);
            }
        };

        let head = &buffer[..head_end];
        let rest = &buffer[head_end + HEAD_TERMINATOR.len()..];

        // 1. Request line (primera línea)
        let (line_bytes, header_bytes) = match find(head, CRLF) {
            Some(pos) => (&head[..pos], &head[pos + CRLF.len()..]),
            None => (head, &head[head.len()..]),
        };
        let line = std::str::from_utf8(line_bytes).map_err(|_| ParseError::MalformedRequestLine)?;
        let (method, path, version) = Self::parse_request_line(line)?;

        // 2. Headers (hasta la línea vacía)
        let headers = Self::parse_headers(header_bytes)?;

        // 3. Body
        let body = Self::parse_body(rest, &headers)?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path HTTP/1.1`, separado por espacios simples.
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::MalformedRequestLine);
        }

        Ok((Method::parse(parts[0]), parts[1].to_string(), parts[2].to_string()))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato `Name: Value`. El nombre se guarda en
    /// minúsculas para que la búsqueda no distinga mayúsculas.
    fn parse_headers(bytes: &[u8]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        if bytes.is_empty() {
            return Ok(headers);
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|_| ParseError::MalformedHeaderLine(String::from_utf8_lossy(bytes).into_owned()))?;

        for line in text.split("\r\n") {
            if line.is_empty() {
                break;
            }

            match line.split_once(": ") {
                Some((name, value)) if !name.is_empty() => {
                    headers.insert(name.to_ascii_lowercase(), value.to_string());
                }
                _ => return Err(ParseError::MalformedHeaderLine(line.to_string())),
            }
        }

        Ok(headers)
    }

    /// Extrae el body según `Content-Length`
    ///
    /// Sin `Content-Length` el body es todo lo que queda en el buffer.
    fn parse_body(rest: &[u8], headers: &HashMap<String, String>) -> Result<Vec<u8>, ParseError> {
        let length = match headers.get("content-length") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| {
                ParseError::MalformedHeaderLine(format!("Content-Length: {}", value))
            })?,
            None => return Ok(rest.to_vec()),
        };

        if rest.len() < length {
            return Err(ParseError::IncompleteRequest);
        }

        Ok(rest[..length].to_vec())
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers (nombres en minúsculas)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico, sin distinguir mayúsculas
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("ACCEPT-ENCODING"), Some("gzip"));
    /// assert_eq!(request.header("missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
