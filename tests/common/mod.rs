//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;
use webhook_router::config::loader::parse_config;
use webhook_router::lifecycle::{Application, Shutdown};
use webhook_router::queue::InMemoryQueue;
use webhook_router::webhook::{sign_payload, GITHUB_EVENT_HEADER, SIGNATURE_HEADER};
use webhook_router::RouterConfig;

/// Flavors used by the end-to-end scenarios.
pub const ROUTING: &str = r#"
    [routing]
    default_flavor = "x64-large"
    ignore_labels = ["self-hosted", "linux"]

    [[routing.flavors]]
    name = "large"
    labels = ["arm64", "large"]

    [[routing.flavors]]
    name = "x64-large"
    labels = ["large", "x64", "jammy"]
"#;

pub const RUN_URL: &str = "https://api.github.com/repos/octo/repo/actions/runs/8200803099";

/// A router running on a local port, backed by an inspectable queue.
#[allow(dead_code)]
pub struct TestRouter {
    pub addr: SocketAddr,
    pub queue: InMemoryQueue,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
    pub secret: Option<String>,
}

#[allow(dead_code)]
impl TestRouter {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a `workflow_job` delivery, signed when a secret is configured.
    pub async fn deliver(&self, body: Vec<u8>) -> reqwest::Response {
        let mut req = self
            .client
            .post(self.url("/webhook"))
            .header("content-type", "application/json")
            .header(GITHUB_EVENT_HEADER, "workflow_job");
        if let Some(secret) = &self.secret {
            req = req.header(SIGNATURE_HEADER, sign_payload(&body, secret).unwrap());
        }
        req.body(body).send().await.unwrap()
    }

    /// Total jobs waiting across the given flavors.
    pub fn pending(&self, flavors: &[&str]) -> usize {
        flavors.iter().map(|f| self.queue.pending(f)).sum()
    }
}

impl Drop for TestRouter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Parse the scenario config, optionally with a webhook secret.
pub fn config(secret: Option<&str>) -> RouterConfig {
    let mut config = parse_config(ROUTING).unwrap();
    config.webhook.secret = secret.map(String::from);
    config
}

/// Start the full application on 127.0.0.1 with an in-memory queue.
pub async fn start_router(config: RouterConfig) -> TestRouter {
    let secret = config.webhook.secret.clone();
    let queue = InMemoryQueue::new(config.queue.max_pending_per_flavor);
    let app = Application::with_queue(config, Arc::new(queue.clone())).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = app.run(listener, server_shutdown).await;
    });

    TestRouter {
        addr,
        queue,
        shutdown,
        client: reqwest::Client::new(),
        secret,
    }
}

/// A `workflow_job` payload shaped like GitHub's.
pub fn payload(action: &str, labels: &[&str]) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "action": action,
        "workflow_job": {
            "id": 22428484402u64,
            "run_id": 8200803099u64,
            "labels": labels,
            "run_url": RUN_URL,
            "status": action,
        },
        "repository": { "full_name": "octo/repo" },
    }))
    .unwrap()
}
