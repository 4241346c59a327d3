//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::builder::DEFAULT_MAX_LABELS_PER_FLAVOR;

/// Root configuration for the webhook router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Webhook endpoint settings.
    pub webhook: WebhookConfig,

    /// Flavor definitions and label routing rules.
    pub routing: RoutingConfig,

    /// Job queue backend.
    pub queue: QueueConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Webhook endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Path GitHub delivers `workflow_job` events to.
    pub path: String,

    /// Shared secret for `X-Hub-Signature-256`. Unset disables verification.
    pub secret: Option<String>,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: "/webhook".to_string(),
            secret: None,
            max_body_size: 1024 * 1024,
        }
    }
}

/// Routing table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Flavors in priority order; earlier entries win overlapping subsets.
    pub flavors: Vec<FlavorConfig>,

    /// Flavor for jobs without routable labels. Defaults to the first flavor.
    pub default_flavor: Option<String>,

    /// Labels dropped before routing (e.g. "self-hosted").
    pub ignore_labels: Vec<String>,

    /// Upper bound on labels per flavor after normalization.
    pub max_labels_per_flavor: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            flavors: Vec::new(),
            default_flavor: None,
            ignore_labels: Vec::new(),
            max_labels_per_flavor: DEFAULT_MAX_LABELS_PER_FLAVOR,
        }
    }
}

/// A single flavor and the labels it serves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlavorConfig {
    pub name: String,

    #[serde(default)]
    pub labels: Vec<String>,
}

/// Job queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Backend URL (e.g., "memory://", "mongodb://localhost:27017/runners").
    pub url: String,

    /// Maximum pending jobs per flavor queue.
    pub max_pending_per_flavor: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: "memory://".to_string(),
            max_pending_per_flavor: 10_000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or an `EnvFilter` directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
