//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the queue backend
//! - Build the routing table from the validated configuration
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The routing table is built before the listener is bound, so an
//!   invalid mapping never receives traffic

use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ConfigError, RouterConfig};
use crate::http::HttpServer;
use crate::observability::logging::LoggingError;
use crate::observability::metrics;
use crate::queue::{self, JobQueue, QueueError};
use crate::routing::{ConfigurationError, JobRouter, TableBuilder};

/// Anything that stops the router from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid routing configuration: {0}")]
    Routing(#[from] ConfigurationError),

    #[error("failed to connect job queue: {0}")]
    Queue(#[from] QueueError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully wired router, ready to bind.
pub struct Application {
    config: RouterConfig,
    router: Arc<JobRouter>,
}

impl Application {
    /// Wire the application with the queue backend named in the config.
    pub async fn build(config: RouterConfig) -> Result<Self, StartupError> {
        let queue = queue::connect(&config.queue).await?;
        Self::with_queue(config, queue)
    }

    /// Wire the application around an existing queue.
    pub fn with_queue(config: RouterConfig, queue: Arc<dyn JobQueue>) -> Result<Self, StartupError> {
        let table = TableBuilder::from_config(&config.routing).build()?;

        tracing::info!(
            flavors = table.flavors().len(),
            entries = table.len(),
            default_flavor = %table.default_flavor(),
            "Routing table built"
        );
        metrics::record_routing_table(table.len(), table.flavors().len());

        let router = Arc::new(JobRouter::new(Arc::new(table), queue));
        Ok(Self { config, router })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn router(&self) -> &Arc<JobRouter> {
        &self.router
    }

    /// Bind the configured listener address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let listener = TcpListener::bind(&self.config.listener.bind_address).await?;
        Ok(listener)
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        HttpServer::new(&self.config, self.router)
            .run(listener, shutdown)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    const CONFIG: &str = r#"
        [routing]
        default_flavor = "small"

        [[routing.flavors]]
        name = "large"
        labels = ["arm64", "large"]

        [[routing.flavors]]
        name = "small"
        labels = ["x64"]
    "#;

    #[tokio::test]
    async fn test_build_from_config() {
        let app = Application::build(parse_config(CONFIG).unwrap()).await.unwrap();
        assert_eq!(app.router().table().default_flavor(), "small");
        assert_eq!(app.router().table().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_routing_is_fatal() {
        let mut config = parse_config(CONFIG).unwrap();
        config.routing.default_flavor = Some("medium".into());
        assert!(matches!(
            Application::build(config).await,
            Err(StartupError::Routing(ConfigurationError::UndeclaredDefaultFlavor(_)))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_queue_is_fatal() {
        let mut config = parse_config(CONFIG).unwrap();
        config.queue.url = "redis://localhost:6379".into();
        assert!(matches!(
            Application::build(config).await,
            Err(StartupError::Queue(QueueError::UnsupportedBackend(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let app = Application::build(parse_config(CONFIG).unwrap()).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = crate::lifecycle::Shutdown::new();
        let handle = tokio::spawn(app.run(listener, shutdown.subscribe()));

        shutdown.trigger();
        handle.await.unwrap().unwrap();
    }
}
