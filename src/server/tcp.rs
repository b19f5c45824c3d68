//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y procesa cada una en su propio thread:
//! leer bytes → parsear → rutear → serializar → escribir → cerrar.
//!
//! El router (con la raíz de archivos) se comparte de solo lectura por
//! `Arc`; no hay estado mutable compartido entre conexiones.

use crate::config::Config;
use crate::files::FileStore;
use crate::http::{ParseError, Request, Response, StatusCode, MAX_REQUEST_SIZE};
use crate::router::Router;
use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Level};

/// Resultado de leer un request del socket
enum ReadOutcome {
    /// Request completo y válido
    Request(Request),

    /// Bytes que no forman un request HTTP
    Malformed(ParseError),

    /// El cliente cerró (o excedió el buffer) antes de completar el request
    Closed { received: usize },
}

/// Permite detener el loop de `accept` desde otro thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_address: SocketAddr,
}

impl ShutdownHandle {
    fn new(local: SocketAddr) -> Self {
        // Para despertar el accept hay que conectarse a una IP concreta
        let wake_ip = match local.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };

        Self {
            flag: Arc::new(AtomicBool::new(false)),
            wake_address: SocketAddr::new(wake_ip, local.port()),
        }
    }

    /// Pide al servidor que deje de aceptar conexiones
    ///
    /// Las conexiones en curso terminan normalmente.
    pub fn shutdown(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            // El accept es bloqueante: una conexión vacía lo despierta
            if let Err(e) = TcpStream::connect(self.wake_address) {
                debug!(error = %e, "wake-up connection failed");
            }
        }
    }

    /// Indica si ya se pidió el apagado
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Servidor HTTP/1.1 concurrente (un thread por conexión)
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Abre el socket de escucha en la dirección fija de la configuración
    pub fn new(config: &Config) -> std::io::Result<Self> {
        Self::bind(config.address(), config)
    }

    /// Abre el socket de escucha en una dirección arbitraria
    ///
    /// Útil en tests con `127.0.0.1:0` (puerto efímero).
    pub fn bind(address: impl ToSocketAddrs, config: &Config) -> std::io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        let shutdown = ShutdownHandle::new(listener.local_addr()?);
        let router = Router::with_default_routes(FileStore::new(config.directory.clone()));

        Ok(Self {
            listener,
            router: Arc::new(router),
            shutdown,
        })
    }

    /// Dirección real en la que quedó escuchando
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle para detener el servidor
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Loop de aceptación; retorna cuando se pide el apagado
    ///
    /// Al retornar se cierra el socket de escucha.
    pub fn run(self) -> std::io::Result<()> {
        info!(address = %self.local_addr()?, "server listening");

        for stream in self.listener.incoming() {
            if self.shutdown.is_shutdown() {
                break;
            }

            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);

                    thread::spawn(move || {
                        let peer = stream
                            .peer_addr()
                            .map(|addr| addr.to_string())
                            .unwrap_or_else(|_| "unknown".to_string());
                        let span = info_span!("connection", %peer);
                        let _guard = span.enter();

                        if let Err(e) = Self::handle_connection(stream, &router) {
                            warn!(error = %e, "connection failed");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                }
            }
        }

        info!("server stopped accepting connections");
        Ok(())
    }

    /// Procesa un único request y cierra la conexión
    fn handle_connection(mut stream: TcpStream, router: &Router) -> std::io::Result<()> {
        let start = Instant::now();

        let response = match Self::read_request(&mut stream)? {
            ReadOutcome::Request(request) => {
                debug!(method = request.method().as_str(), path = request.path(), "request");
                router.route(&request)
            }
            ReadOutcome::Malformed(e) => {
                warn!(error = %e, "parse error");
                Response::new(StatusCode::BadRequest).with_header("Connection", "close")
            }
            ReadOutcome::Closed { received } => {
                debug!(received, "connection closed before a complete request");
                return Ok(());
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        let level = Self::log_level(response.status());
        if level == Level::WARN {
            warn!(status, latency_ms, "response sent");
        } else if level == Level::INFO {
            info!(status, latency_ms, "response sent");
        } else {
            debug!(status, latency_ms, "response sent");
        }

        Ok(())
    }

    /// Nivel de log de una respuesta según la clase del código
    ///
    /// 5xx → WARN, 4xx → INFO, 2xx → DEBUG.
    fn log_level(status: StatusCode) -> Level {
        if status.is_server_error() {
            Level::WARN
        } else if status.is_client_error() {
            Level::INFO
        } else {
            Level::DEBUG
        }
    }

    /// Lee del socket hasta tener un request completo
    ///
    /// Como máximo `MAX_REQUEST_SIZE` bytes.
    ///
    /// Sin `Content-Length` el request se da por completo apenas llega la
    /// línea vacía: el body es lo que vino en esas mismas lecturas y los
    /// bytes que lleguen después se ignoran. Un cliente que manda body
    /// debe declarar su largo.
    fn read_request(stream: &mut impl Read) -> std::io::Result<ReadOutcome> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];
        let mut filled = 0;

        loop {
            let bytes_read = stream.read(&mut buffer[filled..])?;
            if bytes_read == 0 {
                return Ok(ReadOutcome::Closed { received: filled });
            }
            filled += bytes_read;

            match Request::parse(&buffer[..filled]) {
                Ok(request) => return Ok(ReadOutcome::Request(request)),
                Err(ParseError::IncompleteRequest) if filled < buffer.len() => continue,
                Err(ParseError::IncompleteRequest) => {
                    warn!(limit = MAX_REQUEST_SIZE, "request exceeds read buffer");
                    return Ok(ReadOutcome::Closed { received: filled });
                }
                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }
        }
    }
}
