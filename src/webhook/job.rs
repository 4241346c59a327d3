//! The job record extracted from a `workflow_job` webhook.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Lifecycle state of a workflow job, taken from the webhook `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
}

impl JobStatus {
    /// The only status that asks for a runner to be assigned.
    pub const ROUTABLE: JobStatus = JobStatus::Queued;

    pub fn is_routable(self) -> bool {
        self == Self::ROUTABLE
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Waiting => "waiting",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow job as received from GitHub.
///
/// Labels are kept as sent (case preserved) and are normalized by the
/// routing engine. This is also the message format written to the queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    labels: BTreeSet<String>,
    status: JobStatus,
    url: Url,
}

impl Job {
    pub fn new<I>(labels: I, status: JobStatus, url: Url) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            status,
            url,
        }
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
