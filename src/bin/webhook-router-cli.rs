use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use webhook_router::webhook::{sign_payload, GITHUB_EVENT_HEADER, SIGNATURE_HEADER, WORKFLOW_JOB_EVENT};

#[derive(Parser)]
#[command(name = "webhook-router-cli")]
#[command(about = "Operator CLI for the workflow_job webhook router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check router and queue health
    Health,
    /// Deliver a synthetic workflow_job webhook
    Send {
        /// Comma-separated runner labels
        #[arg(short, long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Webhook action (queued, in_progress, completed, waiting)
        #[arg(short, long, default_value = "queued")]
        action: String,

        #[arg(long, default_value = "https://api.github.com/repos/octo/repo/actions/runs/1")]
        run_url: String,

        /// Webhook secret used to sign the payload
        #[arg(short, long, env = "WEBHOOK_SECRET")]
        secret: Option<String>,

        #[arg(short, long, default_value = "/webhook")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Send {
            labels,
            action,
            run_url,
            secret,
            path,
        } => {
            let payload = serde_json::to_vec(&json!({
                "action": action,
                "workflow_job": {
                    "labels": labels,
                    "run_url": run_url,
                },
            }))?;

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(GITHUB_EVENT_HEADER, HeaderValue::from_static(WORKFLOW_JOB_EVENT));
            if let Some(secret) = secret {
                headers.insert(
                    SIGNATURE_HEADER,
                    HeaderValue::from_str(&sign_payload(&payload, &secret)?)?,
                );
            }

            let res = client
                .post(format!("{}{}", cli.url, path))
                .headers(headers)
                .body(payload)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(status_error(status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Non-2xx answers fail the command so scripts see a non-zero exit.
fn status_error(status: reqwest::StatusCode) -> String {
    format!("router returned status {}", status)
}
