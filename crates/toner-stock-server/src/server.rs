// toner-stock-server/src/server.rs
// ============================================================================
// Module: Toner HTTP Server
// Description: Axum transport for the toner API routes.
// Purpose: Expose the toner handlers over HTTP with JSON bodies.
// Dependencies: toner-stock-core, toner-stock-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server maps three routes onto [`TonerHandlers`]:
//!
//! - `/toner/{id}` to the list/get handler
//! - `/toner/{id}/add` to the create handler
//! - `/toner/{id}/put` to the update handler
//!
//! Routes accept every method so the handlers themselves report wrong-method
//! requests. Handlers are synchronous and run on the blocking pool. Every
//! handled request emits one audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::extract::rejection::PathRejection;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::any;
use axum::routing::get;
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use toner_stock_config::AuditConfig;
use toner_stock_config::StoreType;
use toner_stock_config::TonerStockConfig;
use toner_stock_core::HandlerError;
use toner_stock_core::InMemoryTonerCollection;
use toner_stock_core::RequestMethod;
use toner_stock_core::SharedTonerCollection;
use toner_stock_core::TonerHandlers;
use toner_stock_core::TonerReply;
use toner_stock_core::TonerRequest;
use toner_stock_store_sqlite::SqliteTonerCollection;

use crate::audit::ServerNoticeEvent;
use crate::audit::TonerAuditEvent;
use crate::audit::TonerAuditEventParams;
use crate::audit::TonerAuditSink;
use crate::audit::TonerFileAuditSink;
use crate::audit::TonerNoopAuditSink;
use crate::audit::TonerOutcome;
use crate::audit::TonerStderrAuditSink;

// ============================================================================
// SECTION: Toner Server
// ============================================================================

/// Toner HTTP server instance.
pub struct TonerServer {
    /// Server configuration.
    config: TonerStockConfig,
    /// Request handlers over the shared collection.
    handlers: TonerHandlers,
    /// Audit sink for request events.
    audit: Arc<dyn TonerAuditSink>,
}

impl TonerServer {
    /// Builds a new server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when validation or store initialization fails.
    pub fn from_config(config: TonerStockConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let collection = build_collection(&config)?;
        let audit = build_audit_sink(&config.audit)?;
        Ok(Self::with_parts(config, collection, audit))
    }

    /// Builds a server around an existing collection and audit sink.
    #[must_use]
    pub fn with_parts(
        config: TonerStockConfig,
        collection: SharedTonerCollection,
        audit: Arc<dyn TonerAuditSink>,
    ) -> Self {
        Self {
            config,
            handlers: TonerHandlers::new(collection),
            audit,
        }
    }

    /// Returns the axum router for the toner API.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            handlers: self.handlers.clone(),
            audit: Arc::clone(&self.audit),
        });
        Router::new()
            .route("/health", get(handle_health))
            .route("/toner/{id}", any(handle_toner_get))
            .route("/toner/{id}/add", any(handle_toner_add))
            .route("/toner/{id}/put", any(handle_toner_put))
            .fallback(handle_unknown_route)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .with_state(state)
    }

    /// Binds the configured address and serves until interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        let signal = shutdown_on(tokio::signal::ctrl_c(), Arc::clone(&self.audit));
        self.serve_with_listener(listener, signal).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server fails.
    pub async fn serve_with_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("listener address unavailable: {err}")))?;
        emit_startup_notices(self.audit.as_ref(), local_addr);
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the toner collection from configuration.
fn build_collection(config: &TonerStockConfig) -> Result<SharedTonerCollection, ServerError> {
    let collection = match config.store.store_type {
        StoreType::Memory => SharedTonerCollection::from_collection(InMemoryTonerCollection::new()),
        StoreType::Sqlite => {
            let sqlite_config = config
                .store
                .sqlite_config()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let store = SqliteTonerCollection::new(&sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            SharedTonerCollection::from_collection(store)
        }
    };
    Ok(collection)
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn TonerAuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(TonerNoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = TonerFileAuditSink::new(FsPath::new(path.trim()))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TonerStderrAuditSink)),
    }
}

/// Records startup notices, warning when listening beyond loopback.
fn emit_startup_notices(audit: &dyn TonerAuditSink, local_addr: SocketAddr) {
    if !local_addr.ip().is_loopback() {
        audit.record_notice(&ServerNoticeEvent::new(
            "non_loopback_bind",
            format!("toner api reachable beyond loopback on {local_addr} without authentication"),
        ));
    }
    audit.record_notice(&ServerNoticeEvent::new("listening", format!("http://{local_addr}")));
}

/// Resolves when `signal` fires. A signal that cannot be installed is
/// recorded and never resolves, leaving the server running.
async fn shutdown_on<S>(signal: S, audit: Arc<dyn TonerAuditSink>)
where
    S: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        audit.record_notice(&ServerNoticeEvent::new(
            "shutdown_signal_unavailable",
            format!("ctrl-c handler could not be installed; serving until terminated: {err}"),
        ));
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Shared server state for route handlers.
struct ServerState {
    /// Request handlers over the shared collection.
    handlers: TonerHandlers,
    /// Audit sink for request events.
    audit: Arc<dyn TonerAuditSink>,
}

/// Toner API route selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TonerRoute {
    /// `/toner/{id}`.
    Get,
    /// `/toner/{id}/add`.
    Add,
    /// `/toner/{id}/put`.
    Put,
}

impl TonerRoute {
    /// Returns the route template used in audit events.
    const fn template(self) -> &'static str {
        match self {
            Self::Get => "/toner/{id}",
            Self::Add => "/toner/{id}/add",
            Self::Put => "/toner/{id}/put",
        }
    }

    /// Returns true when the route reads a JSON body.
    const fn takes_body(self) -> bool {
        matches!(self, Self::Add | Self::Put)
    }

    /// Returns the only method the route accepts.
    const fn accepted_method(self) -> RequestMethod {
        match self {
            Self::Get => RequestMethod::Get,
            Self::Add => RequestMethod::Post,
            Self::Put => RequestMethod::Put,
        }
    }

    /// Invokes the handler bound to the route.
    fn call(
        self,
        handlers: &TonerHandlers,
        request: &TonerRequest,
    ) -> Result<TonerReply, HandlerError> {
        match self {
            Self::Get => handlers.handle_get(request),
            Self::Add => handlers.handle_create(request),
            Self::Put => handlers.handle_update(request),
        }
    }
}

/// Health probe payload.
#[derive(Serialize)]
struct HealthBody {
    /// Fixed status label.
    status: &'static str,
}

/// Handles `GET /health`.
async fn handle_health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
    })
}

/// Handles `/toner/{id}`.
async fn handle_toner_get(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
    bytes: Bytes,
) -> Response {
    dispatch(&state, TonerRoute::Get, &method, PathId::new(id, &uri), &bytes).await
}

/// Handles `/toner/{id}/add`.
async fn handle_toner_add(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
    bytes: Bytes,
) -> Response {
    dispatch(&state, TonerRoute::Add, &method, PathId::new(id, &uri), &bytes).await
}

/// Handles `/toner/{id}/put`.
async fn handle_toner_put(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
    bytes: Bytes,
) -> Response {
    dispatch(&state, TonerRoute::Put, &method, PathId::new(id, &uri), &bytes).await
}

/// Answers requests that match no route.
async fn handle_unknown_route() -> Response {
    ApiError {
        status: StatusCode::NOT_FOUND,
        kind: "not_found",
        message: "unknown route".to_string(),
    }
    .into_response()
}

/// Identifier segment of a toner route.
struct PathId {
    /// Decoded identifier, or the rejection when it cannot be decoded.
    decoded: Result<String, ApiError>,
    /// Identifier recorded in the audit event.
    audit_id: String,
}

impl PathId {
    /// Resolves the extracted identifier, keeping the raw segment on failure.
    fn new(extracted: Result<Path<String>, PathRejection>, uri: &Uri) -> Self {
        match extracted {
            Ok(Path(id)) => Self {
                audit_id: id.clone(),
                decoded: Ok(id),
            },
            Err(rejection) => Self {
                audit_id: uri.path().split('/').nth(2).unwrap_or_default().to_string(),
                decoded: Err(ApiError {
                    status: StatusCode::BAD_REQUEST,
                    kind: "bad_request",
                    message: format!("invalid toner id in path: {}", rejection.body_text()),
                }),
            },
        }
    }
}

/// Runs one toner request through its handler and records the audit event.
async fn dispatch(
    state: &ServerState,
    route: TonerRoute,
    method: &Method,
    id: PathId,
    bytes: &Bytes,
) -> Response {
    let request_method = RequestMethod::parse(method.as_str());
    let body = if request_method == route.accepted_method() {
        parse_body(route, bytes)
    } else {
        Ok(None)
    };
    let result = match (id.decoded, body) {
        (Ok(path_id), Ok(body)) => {
            let mut request = TonerRequest::new(request_method, path_id);
            if let Some(body) = body {
                request = request.with_body(body);
            }
            run_handler(state.handlers.clone(), route, request).await
        }
        (Err(error), _) | (_, Err(error)) => Err(error),
    };
    let (status, error_kind, response) = match result {
        Ok(reply) => (StatusCode::OK, None, (StatusCode::OK, Json(reply)).into_response()),
        Err(error) => (error.status, Some(error.kind), error.into_response()),
    };
    state.audit.record(&TonerAuditEvent::new(TonerAuditEventParams {
        method: method.as_str().to_string(),
        route: route.template(),
        toner_id: id.audit_id,
        outcome: if error_kind.is_none() { TonerOutcome::Ok } else { TonerOutcome::Error },
        status: status.as_u16(),
        error_kind,
        request_bytes: bytes.len(),
    }));
    response
}

/// Parses the request body for routes that take one; empty bodies are absent.
/// Only called once the method matches the route.
fn parse_body(route: TonerRoute, bytes: &Bytes) -> Result<Option<Value>, ApiError> {
    if !route.takes_body() || bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(bytes).map(Some).map_err(|err| ApiError {
        status: StatusCode::BAD_REQUEST,
        kind: "bad_request",
        message: format!("request body must be valid JSON: {err}"),
    })
}

/// Runs a handler on the blocking pool.
async fn run_handler(
    handlers: TonerHandlers,
    route: TonerRoute,
    request: TonerRequest,
) -> Result<TonerReply, ApiError> {
    tokio::task::spawn_blocking(move || route.call(&handlers, &request))
        .await
        .map_err(|err| ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal",
            message: format!("handler task failed: {err}"),
        })?
        .map_err(ApiError::from)
}

// ============================================================================
// SECTION: Error Responses
// ============================================================================

/// JSON error body returned for every failure.
#[derive(Serialize)]
struct ErrorBody {
    /// Error kind label.
    error: &'static str,
    /// Human-readable message.
    message: String,
}

/// HTTP-level failure with its status and kind.
struct ApiError {
    /// Response status.
    status: StatusCode,
    /// Error kind label.
    kind: &'static str,
    /// Human-readable message.
    message: String,
}

impl From<HandlerError> for ApiError {
    fn from(error: HandlerError) -> Self {
        let status = match &error {
            HandlerError::BadRequest(_) | HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::MalformedRecord(_) | HandlerError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.kind,
                message: self.message,
            }),
        )
            .into_response()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Toner server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
