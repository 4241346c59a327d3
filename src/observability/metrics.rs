//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webhook_requests_total` (counter): webhook deliveries by status code
//! - `webhook_request_duration_seconds` (histogram): handler latency
//! - `jobs_forwarded_total` (counter): jobs enqueued, by flavor
//! - `jobs_skipped_total` (counter): non-queued jobs, by job status
//! - `jobs_rejected_total` (counter): jobs with no matching flavor
//! - `routing_table_entries` (gauge): size of the routing table
//!
//! # Design Decisions
//! - Macros are no-ops until a recorder is installed, so tests need no setup
//! - The Prometheus listener is optional

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_webhook(status: u16, start: Instant) {
    counter!("webhook_requests_total", "status" => status.to_string()).increment(1);
    histogram!("webhook_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_job_forwarded(flavor: &str) {
    counter!("jobs_forwarded_total", "flavor" => flavor.to_string()).increment(1);
}

pub fn record_job_skipped(status: &str) {
    counter!("jobs_skipped_total", "status" => status.to_string()).increment(1);
}

pub fn record_job_rejected() {
    counter!("jobs_rejected_total").increment(1);
}

pub fn record_routing_table(entries: usize, flavors: usize) {
    gauge!("routing_table_entries").set(entries as f64);
    gauge!("routing_table_flavors").set(flavors as f64);
}
