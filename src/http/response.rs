//! Webhook responses and error-to-status mapping.
//!
//! | Outcome | Status |
//! |---|---|
//! | forwarded / ignored | 200 |
//! | bad payload, missing or foreign event, unknown label combination | 400 |
//! | signature missing, malformed or wrong | 403 |
//! | body over the configured limit | 413 |
//! | queue unavailable or full | 503 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::{Flavor, ForwardOutcome, RouterError};
use crate::webhook::{JobStatus, ParseError, SignatureError};

/// JSON body of a successful webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebhookResponse {
    Forwarded { flavor: Flavor },
    Ignored { job_status: JobStatus },
}

impl From<ForwardOutcome> for WebhookResponse {
    fn from(outcome: ForwardOutcome) -> Self {
        match outcome {
            ForwardOutcome::Forwarded(flavor) => WebhookResponse::Forwarded { flavor },
            ForwardOutcome::Skipped(job_status) => WebhookResponse::Ignored { job_status },
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Any reason a webhook delivery was not accepted.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
            WebhookError::Signature(_) => StatusCode::FORBIDDEN,
            WebhookError::Router(RouterError::NonForwardable(_)) => StatusCode::BAD_REQUEST,
            WebhookError::Router(RouterError::Queue(_)) => StatusCode::SERVICE_UNAVAILABLE,
            WebhookError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Webhook failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Webhook rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueError;
    use crate::routing::{normalize, NoMatchError};

    #[test]
    fn test_status_mapping() {
        let no_match = NoMatchError {
            labels: normalize(["arm64", "x64"]),
        };
        let cases = [
            (WebhookError::from(ParseError::MissingEvent), StatusCode::BAD_REQUEST),
            (
                WebhookError::from(ParseError::UnsupportedEvent("push".into())),
                StatusCode::BAD_REQUEST,
            ),
            (WebhookError::from(SignatureError::Missing), StatusCode::FORBIDDEN),
            (WebhookError::from(SignatureError::Mismatch), StatusCode::FORBIDDEN),
            (WebhookError::from(SignatureError::InvalidKey), StatusCode::FORBIDDEN),
            (
                WebhookError::from(RouterError::NonForwardable(no_match)),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebhookError::from(RouterError::Queue(QueueError::Closed)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (WebhookError::BodyTooLarge(10), StatusCode::PAYLOAD_TOO_LARGE),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_rejection_message_names_labels() {
        let error = WebhookError::from(RouterError::NonForwardable(NoMatchError {
            labels: normalize(["X64", "arm64"]),
        }));
        assert_eq!(
            error.to_string(),
            "not able to forward job: invalid label combination: {arm64, x64}"
        );
    }

    #[test]
    fn test_success_body() {
        let forwarded = WebhookResponse::from(ForwardOutcome::Forwarded(
            Flavor::parse("large").unwrap(),
        ));
        assert_eq!(
            serde_json::to_value(&forwarded).unwrap(),
            serde_json::json!({ "status": "forwarded", "flavor": "large" })
        );

        let ignored = WebhookResponse::from(ForwardOutcome::Skipped(JobStatus::Completed));
        assert_eq!(
            serde_json::to_value(&ignored).unwrap(),
            serde_json::json!({ "status": "ignored", "job_status": "completed" })
        );
    }
}
