//! Poller behavior against a mock job service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vedit_client::{ClientConfig, JobPoller, JobServiceClient};
use vedit_models::{JobRecord, JobStatus};

fn record(id: &str, filename: &str, status: JobStatus, progress: u8) -> JobRecord {
    JobRecord::new(id, filename, status, progress)
}

fn poller_against(server: &MockServer, poll_interval: Duration) -> Arc<JobPoller> {
    let config = ClientConfig {
        poll_interval,
        request_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
    .with_base_url(server.uri());
    let service = Arc::new(JobServiceClient::new(config).unwrap());
    Arc::new(JobPoller::new(service, poll_interval))
}

async fn list_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/jobs")
        .count()
}

async fn mount_jobs(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn start_twice_schedules_a_single_poll_loop() {
    let server = MockServer::start().await;
    mount_jobs(&server, json!([])).await;

    let poller = poller_against(&server, Duration::from_millis(50));
    poller.start().await;
    poller.start().await;

    sleep(Duration::from_millis(175)).await;
    poller.stop().await;

    let count = list_request_count(&server).await;
    assert!(count >= 2, "expected immediate fetch plus interval ticks, got {count}");
    assert!(count <= 5, "duplicate schedule detected: {count} fetches in ~3 intervals");
}

#[tokio::test]
async fn stop_halts_future_ticks() {
    let server = MockServer::start().await;
    mount_jobs(&server, json!([])).await;

    let poller = poller_against(&server, Duration::from_millis(50));
    poller.start().await;
    sleep(Duration::from_millis(80)).await;

    poller.stop().await;
    assert!(!poller.is_running().await);
    let count_at_stop = list_request_count(&server).await;

    sleep(Duration::from_millis(250)).await;
    assert_eq!(list_request_count(&server).await, count_at_stop);

    // Repeated stop is safe.
    poller.stop().await;
}

#[tokio::test]
async fn late_response_after_stop_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "j1", "status": "pending", "filename": "clip.mp4", "progress": 0}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Long interval so only the immediate fetch fires.
    let poller = poller_against(&server, Duration::from_secs(10));
    poller.start().await;
    sleep(Duration::from_millis(100)).await;

    let before = poller.jobs().await;
    assert_eq!(before.len(), 1);

    // A slow snapshot is in flight when the poller is stopped.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"id": "j9", "status": "completed", "filename": "other.mp4", "progress": 100}
                ]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let in_flight = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.refresh_now().await })
    };
    sleep(Duration::from_millis(50)).await;
    poller.stop().await;
    in_flight.await.unwrap();

    assert_eq!(poller.jobs().await, before);
}

#[tokio::test]
async fn failed_fetch_preserves_local_state() {
    let server = MockServer::start().await;
    mount_jobs(
        &server,
        json!([
            {"id": "a", "status": "processing", "filename": "a.mp4", "progress": 10},
            {"id": "b", "status": "pending", "filename": "b.mp4", "progress": 0}
        ]),
    )
    .await;

    let poller = poller_against(&server, Duration::from_secs(10));
    poller.refresh_now().await;
    let baseline = poller.jobs().await;
    assert_eq!(baseline.len(), 2);

    // HTTP 500
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;
    poller.refresh_now().await;
    assert_eq!(poller.jobs().await, baseline);

    // Malformed body
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;
    poller.refresh_now().await;
    assert_eq!(poller.jobs().await, baseline);

    // Transport error (server gone)
    drop(server);
    poller.refresh_now().await;
    assert_eq!(poller.jobs().await, baseline);
}

#[tokio::test]
async fn successful_fetch_replaces_list_wholesale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "status": "pending", "filename": "a.mp4", "progress": 0},
            {"id": "b", "status": "pending", "filename": "b.mp4", "progress": 0}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c", "status": "processing", "filename": "c.mp4", "progress": 5}
        ])))
        .mount(&server)
        .await;

    let poller = poller_against(&server, Duration::from_secs(10));
    poller.refresh_now().await;
    assert_eq!(poller.jobs().await.len(), 2);

    poller.refresh_now().await;
    let jobs = poller.jobs().await;
    assert_eq!(
        jobs,
        vec![record("c", "c.mp4", JobStatus::Processing, 5)],
        "absent jobs must disappear, present jobs must not merge"
    );
}

#[tokio::test]
async fn stale_response_does_not_overwrite_fresher_snapshot() {
    let server = MockServer::start().await;
    // Issued first, resolves last.
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"id": "old", "status": "pending", "filename": "old.mp4", "progress": 0}
                ]))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "new", "status": "completed", "filename": "new.mp4", "progress": 100}
        ])))
        .mount(&server)
        .await;

    let poller = poller_against(&server, Duration::from_secs(10));
    let slow = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.refresh_now().await })
    };
    sleep(Duration::from_millis(50)).await;
    poller.refresh_now().await;
    assert_eq!(poller.jobs().await[0].id, "new");

    slow.await.unwrap();
    assert_eq!(
        poller.jobs().await[0].id, "new",
        "earlier-issued fetch resolving later must not win"
    );
}

#[tokio::test]
async fn fetch_order_from_service_is_preserved() {
    let server = MockServer::start().await;
    mount_jobs(
        &server,
        json!([
            {"id": "z", "status": "pending", "filename": "z.mp4", "progress": 0},
            {"id": "a", "status": "completed", "filename": "a.mp4", "progress": 100},
            {"id": "m", "status": "processing", "filename": "m.mp4", "progress": 50}
        ]),
    )
    .await;

    let poller = poller_against(&server, Duration::from_secs(10));
    poller.refresh_now().await;

    let ids: Vec<_> = poller.jobs().await.into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["z", "a", "m"], "no client-side re-sorting");
}
