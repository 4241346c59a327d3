//! End-to-end webhook routing over HTTP.

use reqwest::StatusCode;
use serde_json::Value;
use webhook_router::http::WebhookResponse;
use webhook_router::webhook::{JobStatus, GITHUB_EVENT_HEADER, SIGNATURE_HEADER};

mod common;

use common::{config, payload, start_router, RUN_URL};

const FLAVORS: &[&str] = &["large", "x64-large"];

#[tokio::test]
async fn test_queued_job_lands_on_matching_flavor() {
    let router = start_router(config(None)).await;

    let res = router.deliver(payload("queued", &["arm64", "large"])).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: WebhookResponse = res.json().await.unwrap();
    assert_eq!(
        body,
        WebhookResponse::Forwarded {
            flavor: "large".parse().unwrap()
        }
    );

    // Enqueued exactly once, message carries the job.
    assert_eq!(router.pending(FLAVORS), 1);
    let job = router.queue.pop("large").unwrap().unwrap();
    assert_eq!(job.status(), JobStatus::Queued);
    assert_eq!(job.url().as_str(), RUN_URL);
    assert!(job.labels().contains("arm64"));
}

#[tokio::test]
async fn test_subset_and_mixed_case_routing() {
    let router = start_router(config(None)).await;

    for (labels, flavor) in [
        (&["arm64"][..], "large"),
        (&["ARM64", "Large"][..], "large"),
        (&["x64", "jammy"][..], "x64-large"),
        (&["Jammy", "LARGE", "x64"][..], "x64-large"),
    ] {
        let res = router.deliver(payload("queued", labels)).await;
        assert_eq!(res.status(), StatusCode::OK, "{labels:?}");
        assert_eq!(router.queue.pending(flavor), 1, "{labels:?}");
        router.queue.pop(flavor).unwrap();
    }
}

#[tokio::test]
async fn test_empty_labels_use_default_flavor() {
    let router = start_router(config(None)).await;

    let res = router.deliver(payload("queued", &[])).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(router.queue.pending("x64-large"), 1);
    assert_eq!(router.queue.pending("large"), 0);
}

#[tokio::test]
async fn test_only_ignored_labels_rejected() {
    let router = start_router(config(None)).await;

    for labels in [&["self-hosted"][..], &["self-hosted", "Linux"][..]] {
        let res = router.deliver(payload("queued", labels)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{labels:?}");
    }
    assert_eq!(router.pending(FLAVORS), 0);
}

#[tokio::test]
async fn test_ignored_labels_do_not_block_a_match() {
    let router = start_router(config(None)).await;

    let res = router
        .deliver(payload("queued", &["self-hosted", "linux", "arm64"]))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(router.queue.pending("large"), 1);
}

#[tokio::test]
async fn test_unknown_combination_rejected() {
    let router = start_router(config(None)).await;

    let res = router.deliver(payload("queued", &["arm64", "x64"])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let text = res.text().await.unwrap();
    assert!(text.contains("invalid label combination"), "{text}");
    assert!(text.contains("arm64, x64"), "{text}");

    assert_eq!(router.pending(FLAVORS), 0);
}

#[tokio::test]
async fn test_non_queued_jobs_are_ignored() {
    let router = start_router(config(None)).await;

    for action in ["in_progress", "completed", "waiting"] {
        // Labels that would not even match: routing is never consulted.
        let res = router.deliver(payload(action, &["arm64", "x64"])).await;
        assert_eq!(res.status(), StatusCode::OK, "{action}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "ignored");
        assert_eq!(body["job_status"], action);
    }
    assert_eq!(router.pending(FLAVORS), 0);
}

#[tokio::test]
async fn test_malformed_requests_rejected() {
    let router = start_router(config(None)).await;

    let res = router.deliver(b"not json".to_vec()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = router.deliver(payload("requested", &["arm64"])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = router
        .client
        .post(router.url("/webhook"))
        .body(payload("queued", &["arm64"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = router
        .client
        .post(router.url("/webhook"))
        .header(GITHUB_EVENT_HEADER, "push")
        .body(payload("queued", &["arm64"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(router.pending(FLAVORS), 0);
}

#[tokio::test]
async fn test_signed_delivery_accepted() {
    let router = start_router(config(Some("It's a Secret to Everybody"))).await;

    let res = router.deliver(payload("queued", &["x64"])).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(router.queue.pending("x64-large"), 1);
}

#[tokio::test]
async fn test_bad_signatures_forbidden() {
    let router = start_router(config(Some("It's a Secret to Everybody"))).await;
    let body = payload("queued", &["x64"]);

    let unsigned = router
        .client
        .post(router.url("/webhook"))
        .header(GITHUB_EVENT_HEADER, "workflow_job")
        .body(body.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(unsigned.status(), StatusCode::FORBIDDEN);

    let wrong = router
        .client
        .post(router.url("/webhook"))
        .header(GITHUB_EVENT_HEADER, "workflow_job")
        .header(SIGNATURE_HEADER, "sha256=0000")
        .body(body.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

    let malformed = router
        .client
        .post(router.url("/webhook"))
        .header(GITHUB_EVENT_HEADER, "workflow_job")
        .header(SIGNATURE_HEADER, "md5=abc")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::FORBIDDEN);

    assert_eq!(router.pending(FLAVORS), 0);
}

#[tokio::test]
async fn test_full_queue_is_unavailable() {
    let mut cfg = config(None);
    cfg.queue.max_pending_per_flavor = 1;
    let router = start_router(cfg).await;

    let res = router.deliver(payload("queued", &["arm64"])).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.deliver(payload("queued", &["arm64"])).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(router.queue.pending("large"), 1);
}

#[tokio::test]
async fn test_health_reflects_queue() {
    let router = start_router(config(None)).await;

    let res = router.client.get(router.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    router.queue.close();

    let res = router.client.get(router.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = router.deliver(payload("queued", &["arm64"])).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_large_delivery_within_configured_limit() {
    let mut cfg = config(Some("It's a Secret to Everybody"));
    cfg.webhook.max_body_size = 8 * 1024 * 1024;
    let router = start_router(cfg).await;

    let mut body: Value = serde_json::from_slice(&payload("queued", &["arm64"])).unwrap();
    body["padding"] = Value::String("x".repeat(3 * 1024 * 1024));
    let res = router.deliver(serde_json::to_vec(&body).unwrap()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(router.queue.pending("large"), 1);
}
