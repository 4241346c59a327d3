//! GitHub `workflow_job` Webhook Router
//!
//! Receives `workflow_job` webhooks and enqueues each queued job on the
//! queue of the runner flavor whose labels cover the job's labels.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌────────────────────────────────────────────────────┐
//!                          │                  WEBHOOK ROUTER                    │
//!                          │                                                    │
//!   GitHub delivery        │  ┌─────────┐    ┌───────────┐    ┌──────────────┐  │
//!   ───────────────────────┼─▶│  http   │───▶│  webhook  │───▶│   routing    │  │
//!                          │  │ server  │    │ signature │    │  JobRouter   │  │
//!                          │  └─────────┘    │ + parse   │    │ + table      │  │
//!                          │                 └───────────┘    └──────┬───────┘  │
//!                          │                                         │          │
//!                          │                                         ▼          │
//!                          │                                  ┌──────────────┐  │   per-flavor
//!                          │                                  │    queue     │──┼──▶ queues
//!                          │                                  └──────────────┘  │
//!                          │                                                    │
//!                          │  ┌──────────────────────────────────────────────┐  │
//!                          │  │            Cross-Cutting Concerns            │  │
//!                          │  │   config  ·  observability  ·  lifecycle     │  │
//!                          │  └──────────────────────────────────────────────┘  │
//!                          └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use webhook_router::config::load_config;
use webhook_router::lifecycle::{
    serve_until, wait_for_shutdown_signal, Application, Shutdown, StartupError,
};
use webhook_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "webhook-router")]
#[command(about = "Route GitHub workflow_job webhooks to flavor queues", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "webhook-router.toml")]
    config: PathBuf,

    /// Validate the configuration, print the routing table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "webhook-router starting"
    );

    let observability = &config.observability;
    if observability.metrics_enabled && !args.check {
        // Address already validated by the config loader.
        if let Ok(addr) = observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let app = Application::build(config).await?;

    if args.check {
        let table = app.router().table();
        println!("default flavor: {}", table.default_flavor());
        for (labels, flavor) in table.entries() {
            let labels: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
            println!("{:<40} -> {}", labels.join(", "), flavor);
        }
        return Ok(());
    }

    let listener = app.bind().await?;
    tracing::info!(
        address = %listener.local_addr()?,
        webhook_path = %app.config().webhook.path,
        request_timeout_secs = app.config().timeouts.request_secs,
        "Listening for webhooks"
    );

    let shutdown = Shutdown::new();
    let server = tokio::spawn(app.run(listener, shutdown.subscribe()));
    serve_until(server, wait_for_shutdown_signal(), &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
