//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, path) a un handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas se evalúan en orden de registro y gana la primera que
//! coincide en método y path. Si el path coincide con alguna ruta pero el
//! método no, la respuesta es 405; si ningún path coincide, 404.
//!
//! La tabla se arma una vez al arrancar y después solo se lee.

use crate::files::FileStore;
use crate::handlers;
use crate::http::{Method, Request, Response, StatusCode};

/// Datos que recibe cada handler
pub struct RouteContext<'a> {
    /// Request decodificado
    pub request: &'a Request,

    /// Segmento capturado por un patrón de prefijo (vacío en rutas exactas)
    pub capture: &'a str,

    /// Archivos bajo el directorio raíz
    pub store: &'a FileStore,
}

/// Tipo de función handler
pub type Handler = fn(&RouteContext<'_>) -> Response;

/// Patrón de path de una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// El path debe ser exactamente este
    Exact(&'static str),

    /// El path empieza con este prefijo; el resto (no vacío) se captura tal cual
    Prefix(&'static str),
}

impl PathPattern {
    /// Intenta hacer match; retorna el segmento capturado
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::router::PathPattern;
    ///
    /// let pattern = PathPattern::Prefix("/echo/");
    /// assert_eq!(pattern.matches("/echo/abc/def"), Some("abc/def"));
    /// assert_eq!(pattern.matches("/echo/"), None);
    /// assert_eq!(PathPattern::Exact("/").matches("/"), Some(""));
    /// ```
    pub fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            PathPattern::Exact(expected) => (path == *expected).then_some(""),
            PathPattern::Prefix(prefix) => path
                .strip_prefix(*prefix)
                .filter(|capture| !capture.is_empty()),
        }
    }
}

/// Una ruta: método + patrón + handler
struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// Router que mapea requests a handlers
pub struct Router {
    routes: Vec<Route>,
    store: FileStore,
}

impl Router {
    /// Crea un router vacío sobre el store dado
    pub fn new(store: FileStore) -> Self {
        Self {
            routes: Vec::new(),
            store,
        }
    }

    /// Crea el router con la tabla fija de rutas del servidor
    ///
    /// | Método | Path               |
    /// |--------|--------------------|
    /// | GET    | `/`                |
    /// | GET    | `/user-agent`      |
    /// | GET    | `/echo/<texto>`    |
    /// | GET    | `/files/<nombre>`  |
    /// | POST   | `/files/<nombre>`  |
    pub fn with_default_routes(store: FileStore) -> Self {
        let mut router = Self::new(store);

        router.register(Method::GET, PathPattern::Exact("/"), handlers::root_handler);
        router.register(Method::GET, PathPattern::Exact("/user-agent"), handlers::user_agent_handler);
        router.register(Method::GET, PathPattern::Prefix("/echo/"), handlers::echo_handler);
        router.register(Method::GET, PathPattern::Prefix("/files/"), handlers::read_file_handler);
        router.register(Method::POST, PathPattern::Prefix("/files/"), handlers::write_file_handler);

        router
    }

    /// Registra una ruta con su handler
    pub fn register(&mut self, method: Method, pattern: PathPattern, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::files::FileStore;
    /// use crafted_http::http::{Request, StatusCode};
    /// use crafted_http::router::Router;
    ///
    /// let router = Router::with_default_routes(FileStore::new("."));
    ///
    /// let request = Request::parse(b"GET /nope HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).status(), StatusCode::NotFound);
    /// ```
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();
        let mut allowed: Vec<&str> = Vec::new();

        for route in &self.routes {
            let Some(capture) = route.pattern.matches(path) else {
                continue;
            };

            if &route.method == request.method() {
                let ctx = RouteContext {
                    request,
                    capture,
                    store: &self.store,
                };
                let mut response = (route.handler)(&ctx);
                self.add_common_headers(&mut response);
                return response;
            }

            if !allowed.contains(&route.method.as_str()) {
                allowed.push(route.method.as_str());
            }
        }

        let mut response = if allowed.is_empty() {
            Response::new(StatusCode::NotFound)
        } else {
            // El path existe pero no con este método
            Response::new(StatusCode::MethodNotAllowed).with_header("Allow", &allowed.join(", "))
        };
        self.add_common_headers(&mut response);
        response
    }

    /// Agrega headers comunes a todas las respuestas
    fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Connection", "close");
    }
}
