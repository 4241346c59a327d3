//! Label-to-flavor routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table Compilation (at startup):
//!     RoutingConfig (ordered flavor → labels)
//!     → labels.rs (lowercase, dedupe, sort)
//!     → builder.rs (expand every non-empty label subset, first flavor wins)
//!     → Freeze as immutable RoutingTable
//!
//! Incoming Job (labels, status, url)
//!     → router.rs (skip anything that is not `queued`)
//!     → matcher.rs (canonical key lookup)
//!     → Return: Flavor, or NoMatch → NonForwardable rejection
//!     → queue collaborator
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime (shared via `Arc`)
//! - Power set expanded once so every lookup is a single hash access
//! - Exact match on the canonical key, no superset or fuzzy matching
//! - Empty label set resolves to the default flavor, never via the table
//! - Deterministic: earlier-declared flavors win ambiguous subsets

pub mod builder;
pub mod error;
pub mod flavor;
pub mod labels;
pub mod matcher;
pub mod router;

pub use builder::{
    build, FlavorLabelsMapping, TableBuilder, DEFAULT_MAX_LABELS_PER_FLAVOR, MAX_LABELS_CEILING,
};
pub use error::{ConfigurationError, NoMatchError};
pub use flavor::Flavor;
pub use labels::{normalize, Label, LabelSet};
pub use matcher::RoutingTable;
pub use router::{ForwardOutcome, JobRouter, RouterError};
