//! GitHub webhook handling.
//!
//! # Data Flow
//! ```text
//! POST /webhook (raw body + headers)
//!     → signature.rs (HMAC-SHA256 over the raw body)
//!     → parse.rs (X-GitHub-Event check, workflow_job payload → Job)
//!     → job.rs (immutable Job handed to the routing engine)
//! ```

pub mod job;
pub mod parse;
pub mod signature;

pub use job::{Job, JobStatus};
pub use parse::{check_event, parse_workflow_job, ParseError, GITHUB_EVENT_HEADER, WORKFLOW_JOB_EVENT};
pub use signature::{sign_payload, verify_signature, SignatureError, SIGNATURE_HEADER};
