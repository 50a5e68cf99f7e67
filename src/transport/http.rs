//! HTTP transport built on warp
//!
//! Serves `POST /api/chatbot` next to the observability endpoints and
//! shuts down gracefully when asked.

use crate::config::{AssistantConfig, ServerSection};
use crate::error::{AssistantError, AssistantResult, GENERIC_FAILURE_MESSAGE};
use crate::observability::health::{health_routes, HealthState};
use crate::observability::metrics::metrics;
use crate::routing::{IntentRouter, RoutingResult};
use crate::server_span;
use crate::service::ChatService;
use bytes::Bytes;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Name reported by `/health` and `/`
pub const SERVICE_NAME: &str = "urban-assistant";

fn with_service(
    service: Arc<ChatService>,
) -> impl Filter<Extract = (Arc<ChatService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// `POST /api/chatbot`
pub fn chat_route(
    service: Arc<ChatService>,
    max_body_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "chatbot")
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::bytes())
        .and(with_service(service))
        .map(|body: Bytes, service: Arc<ChatService>| {
            let reply = service.handle(&body);
            warp::reply::with_status(warp::reply::json(&reply.body), reply.status)
        })
}

fn cors(allowed_origins: &[String]) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    if allowed_origins.is_empty() {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(allowed_origins.iter().map(String::as_str))
    }
}

/// Every route the server exposes, with CORS, request tracing and JSON
/// error bodies for rejections
pub fn routes(
    service: Arc<ChatService>,
    health: Arc<HealthState>,
    server: &ServerSection,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    chat_route(service, server.max_body_bytes)
        .or(health_routes(health))
        .with(cors(&server.allowed_origins))
        .with(warp::trace::request())
        .recover(handle_rejection)
}

/// Turn warp rejections into the same `{success, message}` shape the chat
/// endpoint uses
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header is required")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::cors::CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, "Origin not allowed")
    } else {
        error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE)
    };

    let body = RoutingResult::rejected(message);
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// A bound, running HTTP server
pub struct HttpServer {
    addr: SocketAddr,
    health: Arc<HealthState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HttpServer {
    /// Bind the configured address and start serving in the background.
    ///
    /// Readiness flips to true once the listener is bound. Port 0 picks a
    /// free port; see [`HttpServer::addr`].
    pub async fn start(config: &AssistantConfig, router: Arc<IntentRouter>) -> AssistantResult<Self> {
        let addr = config.server.socket_addr()?;
        Self::start_on(addr, config, router).await
    }

    /// Like [`HttpServer::start`] with an explicit bind address
    pub async fn start_on(
        addr: SocketAddr,
        config: &AssistantConfig,
        router: Arc<IntentRouter>,
    ) -> AssistantResult<Self> {
        let health = Arc::new(HealthState::new(SERVICE_NAME, router.rule_count()));
        let service = Arc::new(
            ChatService::new(router, config.defaults.clone()).with_health(health.clone()),
        );
        let filters = routes(service, health.clone(), &config.server);

        metrics().set_server_state("starting");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (bound, server) = warp::serve(filters)
            .try_bind_with_graceful_shutdown(addr, async move {
                let _ = shutdown_rx.await;
            })
            .map_err(|e| AssistantError::server(format!("failed to bind {addr}: {e}")))?;

        let span = server_span!(addr = %bound);
        let handle = tokio::spawn(server.instrument(span));

        health.set_ready(true);
        metrics().set_server_state("running");
        info!(addr = %bound, "HTTP server listening");

        Ok(Self {
            addr: bound,
            health,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn health(&self) -> &Arc<HealthState> {
        &self.health
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) -> AssistantResult<()> {
        self.health.set_ready(false);
        metrics().set_server_state("stopping");

        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .map_err(|e| AssistantError::server(format!("server task failed: {e}")))?;
        }

        metrics().set_server_state("stopped");
        info!(addr = %self.addr, "HTTP server stopped");
        Ok(())
    }
}

impl Drop for HttpServer {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }
}
