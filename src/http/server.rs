//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the webhook and health handlers
//! - Wire up middleware (tracing, limits, request ID, signature)
//! - Bind server to listener
//! - Dispatch accepted jobs to the job router

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::middleware::signature_middleware;
use crate::http::response::{WebhookError, WebhookResponse};
use crate::observability::metrics;
use crate::routing::JobRouter;
use crate::webhook::{check_event, parse_workflow_job, GITHUB_EVENT_HEADER};

/// Liveness/readiness probe path.
pub const HEALTH_PATH: &str = "/health";

const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<JobRouter>,
    pub webhook_secret: Option<Arc<str>>,
    pub max_body_size: usize,
}

/// HTTP front end of the webhook router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &RouterConfig, job_router: Arc<JobRouter>) -> Self {
        let state = AppState {
            router: job_router,
            webhook_secret: config.webhook.secret.as_deref().map(Arc::from),
            max_body_size: config.webhook.max_body_size,
        };

        if state.webhook_secret.is_none() {
            tracing::warn!("No webhook secret configured, signatures are not verified");
        }

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let webhook = post(webhook_handler).route_layer(middleware::from_fn_with_state(
            state.clone(),
            signature_middleware,
        ));

        Router::new()
            .route(&config.webhook.path, webhook)
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state)
            // Extractors cap bodies at 2 MiB unless told otherwise.
            .layer(DefaultBodyLimit::max(config.webhook.max_body_size))
            .layer(RequestBodyLimitLayer::new(config.webhook.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let request_id = req
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured Axum router, for embedding or in-process tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Accept a `workflow_job` delivery and route it.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let response = match handle_webhook(&state, &headers, &body).await {
        Ok(accepted) => accepted.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_webhook(response.status().as_u16(), start);
    response
}

async fn handle_webhook(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookResponse, WebhookError> {
    let event = headers
        .get(GITHUB_EVENT_HEADER)
        .and_then(|v| v.to_str().ok());
    check_event(event)?;

    let job = parse_workflow_job(body)?;
    let outcome = state.router.forward(&job).await?;
    Ok(outcome.into())
}

/// Report whether jobs can currently be enqueued.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.router.can_forward().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        tracing::warn!("Health check failed: queue unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
