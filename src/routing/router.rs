//! Job dispatch to flavor queues.
//!
//! # Responsibilities
//! - Ignore lifecycle notifications (only `queued` jobs need a runner)
//! - Resolve the job's labels through the routing table
//! - Hand `(job, flavor)` to the queue collaborator
//!
//! # Design Decisions
//! - Stateless apart from shared, immutable table and queue handles
//! - A label mismatch is a per-request rejection, never fatal
//! - Enqueue failures propagate untouched; retry policy belongs to the queue

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::observability::metrics;
use crate::queue::{JobQueue, QueueError};
use crate::routing::error::NoMatchError;
use crate::routing::flavor::Flavor;
use crate::routing::matcher::RoutingTable;
use crate::webhook::job::{Job, JobStatus};

/// Errors returned by [`JobRouter::forward`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// The job's label combination has no configured route.
    #[error("not able to forward job: {0}")]
    NonForwardable(#[source] NoMatchError),

    /// The queue collaborator failed to accept the job.
    #[error("failed to enqueue job: {0}")]
    Queue(#[from] QueueError),
}

/// Successful result of [`JobRouter::forward`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The job was handed to the queue for this flavor.
    Forwarded(Flavor),
    /// The job is not in a routable state and was dropped on purpose.
    Skipped(JobStatus),
}

/// Routes jobs to flavor queues.
#[derive(Clone)]
pub struct JobRouter {
    table: Arc<RoutingTable>,
    queue: Arc<dyn JobQueue>,
}

impl JobRouter {
    pub fn new(table: Arc<RoutingTable>, queue: Arc<dyn JobQueue>) -> Self {
        Self { table, queue }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Forward a job to the queue matching its labels.
    ///
    /// Jobs that are not `queued` are skipped without touching the queue.
    pub async fn forward(&self, job: &Job) -> Result<ForwardOutcome, RouterError> {
        if !job.status().is_routable() {
            tracing::debug!(status = %job.status(), url = %job.url(), "Ignoring job that is not queued");
            metrics::record_job_skipped(job.status().as_str());
            return Ok(ForwardOutcome::Skipped(job.status()));
        }

        let flavor = match self.table.match_labels(job.labels()) {
            Ok(flavor) => flavor.clone(),
            Err(e) => {
                tracing::warn!(url = %job.url(), error = %e, "Rejecting job");
                metrics::record_job_rejected();
                return Err(RouterError::NonForwardable(e));
            }
        };

        tracing::info!(
            url = %job.url(),
            flavor = %flavor,
            labels = ?job.labels(),
            "Forwarding job"
        );
        self.queue.add_job_to_queue(job, &flavor).await?;
        metrics::record_job_forwarded(flavor.as_str());

        Ok(ForwardOutcome::Forwarded(flavor))
    }

    /// Whether the queue collaborator is reachable.
    pub async fn can_forward(&self) -> bool {
        self.queue.can_connect().await
    }
}

impl fmt::Debug for JobRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRouter")
            .field("flavors", &self.table.flavors())
            .field("entries", &self.table.len())
            .field("queue", &self.queue)
            .finish()
    }
}
