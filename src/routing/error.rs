//! Routing engine error types.

use thiserror::Error;

use crate::routing::labels::{format_labels, LabelSet};

/// Malformed or ambiguous routing configuration.
///
/// Raised while building the routing table. Always fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No flavors were declared.
    #[error("flavor mapping must declare at least one flavor")]
    EmptyMapping,

    /// The same flavor name appears twice in the mapping.
    #[error("flavor `{0}` is declared more than once")]
    DuplicateFlavor(String),

    /// A flavor (or default flavor) name is not a well-formed identifier.
    #[error("`{0}` is not a well-formed flavor name")]
    InvalidFlavorName(String),

    /// The default flavor is not one of the declared flavors.
    #[error("default flavor `{0}` is not one of the declared flavors")]
    UndeclaredDefaultFlavor(String),

    /// A flavor declares more labels than the power-set expansion allows.
    #[error("flavor `{flavor}` declares {count} labels, more than the limit of {limit}")]
    TooManyLabels {
        flavor: String,
        count: usize,
        limit: usize,
    },

    /// The configured label limit is above the supported ceiling.
    #[error("label limit {limit} exceeds the supported maximum of {ceiling}")]
    LabelLimitTooHigh { limit: usize, ceiling: usize },
}

/// No configured route for a label combination.
///
/// Internal to the matcher; the job router translates it into
/// [`RouterError::NonForwardable`](crate::routing::RouterError::NonForwardable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid label combination: {}", format_labels(.labels))]
pub struct NoMatchError {
    /// The normalized labels that failed to match.
    pub labels: LabelSet,
}
