//! In-process job queue.
//!
//! One bounded FIFO of JSON-encoded jobs per flavor. Used for development,
//! single-process deployments and tests; consumers drain it with [`pop`].
//!
//! [`pop`]: InMemoryQueue::pop

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::queue::{JobQueue, QueueError};
use crate::routing::flavor::Flavor;
use crate::webhook::job::Job;

/// A thread-safe, per-flavor in-memory queue.
///
/// Clones share the same underlying queues.
#[derive(Debug, Clone)]
pub struct InMemoryQueue {
    queues: Arc<DashMap<Flavor, VecDeque<String>>>,
    capacity: usize,
    closed: Arc<AtomicBool>,
}

impl InMemoryQueue {
    /// Create a queue holding at most `capacity` pending jobs per flavor.
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Arc::new(DashMap::new()),
            capacity,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Take the oldest message for `flavor`.
    pub fn pop_message(&self, flavor: &str) -> Option<String> {
        self.queues.get_mut(flavor)?.pop_front()
    }

    /// Take and decode the oldest job for `flavor`.
    pub fn pop(&self, flavor: &str) -> Result<Option<Job>, QueueError> {
        self.pop_message(flavor)
            .map(|msg| serde_json::from_str(&msg))
            .transpose()
            .map_err(QueueError::from)
    }

    /// Number of jobs waiting for `flavor`.
    pub fn pending(&self, flavor: &str) -> usize {
        self.queues.get(flavor).map(|q| q.len()).unwrap_or(0)
    }

    /// Stop accepting jobs; the health probe reports unavailable afterwards.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobQueue for InMemoryQueue {
    async fn add_job_to_queue(&self, job: &Job, flavor: &Flavor) -> Result<(), QueueError> {
        if self.is_closed() {
            return Err(QueueError::Closed);
        }

        let msg = serde_json::to_string(job)?;
        let mut queue = self.queues.entry(flavor.clone()).or_default();
        if queue.len() >= self.capacity {
            return Err(QueueError::Full {
                flavor: flavor.to_string(),
                capacity: self.capacity,
            });
        }
        queue.push_back(msg);
        tracing::debug!(flavor = %flavor, pending = queue.len(), "Job enqueued");
        Ok(())
    }

    async fn can_connect(&self) -> bool {
        !self.is_closed()
    }
}
