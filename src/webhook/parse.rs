//! `workflow_job` payload parsing.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::webhook::job::{Job, JobStatus};

/// Header carrying the GitHub event name.
pub const GITHUB_EVENT_HEADER: &str = "x-github-event";

/// The only event this service routes.
pub const WORKFLOW_JOB_EVENT: &str = "workflow_job";

/// A webhook request that cannot be turned into a [`Job`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("X-GitHub-Event header is missing")]
    MissingEvent,

    #[error("event `{0}` is not supported, only `workflow_job` is routed")]
    UnsupportedEvent(String),

    #[error("could not parse webhook: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct WorkflowJobEvent {
    action: JobStatus,
    workflow_job: WorkflowJob,
}

#[derive(Debug, Deserialize)]
struct WorkflowJob {
    labels: Vec<String>,
    run_url: Url,
}

/// Check the `X-GitHub-Event` header value.
pub fn check_event(event: Option<&str>) -> Result<(), ParseError> {
    match event {
        Some(WORKFLOW_JOB_EVENT) => Ok(()),
        Some(other) => Err(ParseError::UnsupportedEvent(other.to_string())),
        None => Err(ParseError::MissingEvent),
    }
}

/// Extract the job from a raw `workflow_job` webhook body.
///
/// Requires `action`, `workflow_job.labels` and `workflow_job.run_url`;
/// other fields are ignored.
pub fn parse_workflow_job(body: &[u8]) -> Result<Job, ParseError> {
    let event: WorkflowJobEvent = serde_json::from_slice(body)?;
    Ok(Job::new(
        event.workflow_job.labels,
        event.action,
        event.workflow_job.run_url,
    ))
}
