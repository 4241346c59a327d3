//! Webhook signature middleware.
//! Rejects deliveries whose `X-Hub-Signature-256` does not match the body.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::WebhookError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::webhook::{verify_signature, SignatureError, SIGNATURE_HEADER};

pub async fn signature_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // No secret configured: verification disabled.
    let Some(secret) = state.webhook_secret.clone() else {
        return next.run(req).await;
    };

    let start = Instant::now();
    match verified(req, &secret, state.max_body_size).await {
        Ok(req) => next.run(req).await,
        Err(e) => {
            let response = e.into_response();
            metrics::record_webhook(response.status().as_u16(), start);
            response
        }
    }
}

/// Buffer the body, check it, and rebuild the request for the handler.
async fn verified(
    req: Request<Body>,
    secret: &str,
    limit: usize,
) -> Result<Request<Body>, WebhookError> {
    let (parts, body) = req.into_parts();

    let header = parts
        .headers
        .get(SIGNATURE_HEADER)
        .ok_or(SignatureError::Missing)?
        .to_str()
        .map_err(|_| SignatureError::Malformed)?;

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| WebhookError::BodyTooLarge(limit))?;

    verify_signature(&bytes, secret, header)?;

    Ok(Request::from_parts(parts, Body::from(bytes)))
}
