//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (WEBHOOK_SECRET, QUEUE_URL)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → routing section handed to the table builder
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::FlavorConfig;
pub use schema::QueueConfig;
pub use schema::RouterConfig;
pub use schema::RoutingConfig;
