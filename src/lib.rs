//! GitHub `workflow_job` Webhook Router Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod queue;
pub mod routing;
pub mod webhook;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
pub use routing::{JobRouter, RoutingTable};
