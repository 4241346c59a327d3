//! MongoDB job queue.
//!
//! Each flavor is a collection named after it; every routed job is inserted
//! as one document. Runner managers consume the collections.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Database};

use crate::queue::{JobQueue, QueueError};
use crate::routing::flavor::Flavor;
use crate::webhook::job::Job;

/// Database used when the URL names none.
pub const DEFAULT_DATABASE: &str = "webhook_router";

#[derive(Debug, Clone)]
pub struct MongoQueue {
    database: Database,
}

impl MongoQueue {
    /// Create a client for `url`. Servers are contacted lazily, on the first
    /// insert or ping.
    pub async fn connect(url: &str) -> Result<Self, QueueError> {
        let client = Client::with_uri_str(url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        Ok(Self { database })
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

#[async_trait]
impl JobQueue for MongoQueue {
    async fn add_job_to_queue(&self, job: &Job, flavor: &Flavor) -> Result<(), QueueError> {
        let document = mongodb::bson::to_document(job)?;
        self.database
            .collection::<Document>(flavor.as_str())
            .insert_one(document)
            .await?;
        Ok(())
    }

    async fn can_connect(&self) -> bool {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "MongoDB ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::job::JobStatus;

    // Nothing listens on port 9; server selection gives up quickly.
    const UNREACHABLE: &str =
        "mongodb://127.0.0.1:9/runners?serverSelectionTimeoutMS=200&connectTimeoutMS=200";

    fn job() -> Job {
        Job::new(
            ["arm64"],
            JobStatus::Queued,
            "https://api.github.com/repos/octo/repo/actions/runs/1".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_database_from_url_path() {
        let queue = MongoQueue::connect(UNREACHABLE).await.unwrap();
        assert_eq!(queue.database_name(), "runners");

        let queue = MongoQueue::connect("mongodb://127.0.0.1:9").await.unwrap();
        assert_eq!(queue.database_name(), DEFAULT_DATABASE);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let queue = MongoQueue::connect(UNREACHABLE).await.unwrap();
        assert!(!queue.can_connect().await);

        let flavor: Flavor = "large".parse().unwrap();
        let err = queue.add_job_to_queue(&job(), &flavor).await.unwrap_err();
        assert!(matches!(err, QueueError::Mongo(_)), "{err}");
    }

    #[tokio::test]
    async fn test_invalid_connection_string() {
        let err = MongoQueue::connect("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=soon").await.unwrap_err();
        assert!(matches!(err, QueueError::Mongo(_)), "{err}");
    }

    /// Needs a server: `MONGODB_URL=mongodb://localhost:27017 cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_insert_into_flavor_collection() {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let queue = MongoQueue::connect(&url).await.unwrap();
        assert!(queue.can_connect().await);

        let flavor: Flavor = "large".parse().unwrap();
        let collection = queue.database.collection::<Document>(flavor.as_str());
        let before = collection.count_documents(doc! {}).await.unwrap();

        queue.add_job_to_queue(&job(), &flavor).await.unwrap();
        assert_eq!(collection.count_documents(doc! {}).await.unwrap(), before + 1);
    }
}
