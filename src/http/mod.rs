//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, body limit, tracing)
//!     → middleware/signature.rs (X-Hub-Signature-256, when a secret is set)
//!     → server.rs webhook handler (event check, parse, JobRouter::forward)
//!     → response.rs (outcome or error → status code + body)
//!     → Send to GitHub
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use response::{WebhookError, WebhookResponse};
pub use server::{AppState, HttpServer, HEALTH_PATH};
