//! Prometheus text exposition over HTTP.
//!
//! Any GET is answered with the current registry contents, whatever the
//! path, so both `/` and `/metrics` work. Everything else gets a 405.

use crate::utils::error::ServerError;
use log::{debug, info, warn};
use prometheus::{Encoder, Registry, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Render the registry in the Prometheus text format
///
/// **Public** - also used by the replay command
///
/// # Errors
/// * `ServerError::EncodeFailed` - a gathered metric could not be encoded
pub fn render_text(registry: &Registry) -> Result<String, ServerError> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// A bound, not yet serving, metrics endpoint
pub struct MetricsServer {
    server: Arc<Server>,
}

impl MetricsServer {
    /// Bind the endpoint
    ///
    /// # Arguments
    /// * `addr` - `host:port`; port 0 picks a free port
    ///
    /// # Errors
    /// * `ServerError::BindFailed` - address in use or not resolvable
    pub fn bind(addr: &str) -> Result<Self, ServerError> {
        let server = Server::http(addr).map_err(|e| ServerError::BindFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            server: Arc::new(server),
        })
    }

    /// Address actually bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve `registry` on a background thread
    ///
    /// **Public** - the exposition runs next to the producer loop
    ///
    /// # Errors
    /// * `ServerError::SpawnFailed` - the thread could not be created
    pub fn spawn(self, registry: Registry) -> Result<ServerHandle, ServerError> {
        if let Some(addr) = self.local_addr() {
            info!("Serving metrics on http://{}/metrics", addr);
        }

        let server = Arc::clone(&self.server);
        let thread = thread::Builder::new()
            .name("metrics-http".to_string())
            .spawn(move || serve(&server, &registry))?;

        Ok(ServerHandle {
            server: self.server,
            thread,
        })
    }
}

/// A serving endpoint
pub struct ServerHandle {
    server: Arc<Server>,
    thread: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Stop accepting requests and wait for the serving thread
    pub fn shutdown(self) {
        self.server.unblock();
        if self.thread.join().is_err() {
            warn!("Metrics server thread panicked");
        }
    }
}

/// Answer requests until the server is unblocked
fn serve(server: &Server, registry: &Registry) {
    for request in server.incoming_requests() {
        handle(request, registry);
    }
    debug!("Metrics server stopped");
}

fn handle(request: Request, registry: &Registry) {
    debug!("{} {}", request.method(), request.url());

    let result = if *request.method() != Method::Get {
        request.respond(Response::from_string("Method Not Allowed").with_status_code(StatusCode(405)))
    } else {
        match render_text(registry) {
            Ok(body) => {
                let mut response = Response::from_string(body);
                if let Ok(header) =
                    Header::from_bytes(&b"Content-Type"[..], TextEncoder::new().format_type().as_bytes())
                {
                    response.add_header(header);
                }
                request.respond(response)
            }
            Err(e) => {
                warn!("{}", e);
                request.respond(Response::from_string(e.to_string()).with_status_code(StatusCode(500)))
            }
        }
    };

    if let Err(e) = result {
        warn!("Failed to send metrics response: {}", e);
    }
}
