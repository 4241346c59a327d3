//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//! - Check the log filter parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Routing rules are checked by the table builder, which owns their semantics

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::RouterConfig;
use crate::http::server::HEALTH_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("webhook.path `{0}` must start with '/' and contain only URL-safe characters")]
    InvalidWebhookPath(String),

    #[error("webhook.path `{0}` is reserved")]
    ReservedWebhookPath(String),

    #[error("webhook.secret must not be empty when set")]
    EmptySecret,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level `{0}` is not a valid filter")]
    InvalidLogLevel(String),
}

fn valid_path(path: &str) -> bool {
    path.starts_with('/')
        && path.len() > 1
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~'))
}

/// Check a deserialized config, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let path = &config.webhook.path;
    if !valid_path(path) {
        errors.push(ValidationError::InvalidWebhookPath(path.clone()));
    } else if path == HEALTH_PATH {
        errors.push(ValidationError::ReservedWebhookPath(path.clone()));
    }

    if config.webhook.secret.as_deref() == Some("") {
        errors.push(ValidationError::EmptySecret);
    }

    if config.webhook.max_body_size == 0 {
        errors.push(ValidationError::Zero("webhook.max_body_size"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.queue.max_pending_per_flavor == 0 {
        errors.push(ValidationError::Zero("queue.max_pending_per_flavor"));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            obs.metrics_address.clone(),
        ));
    }
    if EnvFilter::try_new(&obs.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
