//! Job queue collaborator.
//!
//! # Data Flow
//! ```text
//! JobRouter
//!     → JobQueue::add_job_to_queue(job, flavor)
//!     → backend (one queue per flavor, JSON messages)
//!
//! /health
//!     → JobQueue::can_connect()
//! ```
//!
//! # Design Decisions
//! - Backend chosen from an explicit `QueueConfig`, never from globals
//! - The router does not retry; delivery guarantees belong to the backend
//! - Trait object behind `Arc` so tests can substitute fakes

pub mod memory;
pub mod mongodb;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::config::schema::QueueConfig;
use crate::routing::flavor::Flavor;
use crate::webhook::job::Job;

pub use memory::InMemoryQueue;
pub use self::mongodb::MongoQueue;

/// Errors raised by queue backends.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid queue url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported queue backend `{0}`")]
    UnsupportedBackend(String),

    #[error("queue for flavor `{flavor}` is full ({capacity} pending jobs)")]
    Full { flavor: String, capacity: usize },

    #[error("queue backend is closed")]
    Closed,

    #[error("invalid job message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("job cannot be stored as a document: {0}")]
    Document(#[from] ::mongodb::bson::ser::Error),

    #[error("mongodb: {0}")]
    Mongo(#[from] ::mongodb::error::Error),
}

/// Destination for routed jobs.
#[async_trait]
pub trait JobQueue: Send + Sync + std::fmt::Debug {
    /// Enqueue `job` on the queue named after `flavor`.
    async fn add_job_to_queue(&self, job: &Job, flavor: &Flavor) -> Result<(), QueueError>;

    /// Connectivity probe used by the health endpoint.
    async fn can_connect(&self) -> bool;
}

/// Create the backend named by `config.url`.
///
/// Supported schemes: `memory://`, `mongodb://` and `mongodb+srv://`.
pub async fn connect(config: &QueueConfig) -> Result<Arc<dyn JobQueue>, QueueError> {
    let url = Url::parse(&config.url).map_err(|source| QueueError::InvalidUrl {
        url: config.url.clone(),
        source,
    })?;

    match url.scheme() {
        "memory" => {
            tracing::info!(
                capacity = config.max_pending_per_flavor,
                "Using in-memory job queue"
            );
            Ok(Arc::new(InMemoryQueue::new(config.max_pending_per_flavor)))
        }
        "mongodb" | "mongodb+srv" => {
            let queue = MongoQueue::connect(&config.url).await?;
            tracing::info!(
                host = url.host_str().unwrap_or_default(),
                database = queue.database_name(),
                "Using MongoDB job queue"
            );
            Ok(Arc::new(queue))
        }
        other => Err(QueueError::UnsupportedBackend(other.to_string())),
    }
}
