//! Job lifecycle over HTTP: enqueue, exactly-once claim, terminal report.

use std::collections::HashSet;

use axum::http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn full_job_lifecycle() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    // Enqueue under a fresh active license.
    let resp = app
        .request(
            "POST",
            "/api/print/jobs",
            Some(serde_json::json!({"printer_uid": "HP1", "content": "base64xyz"})),
            Some(&license.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let job_id = resp.json["job_id"].as_str().unwrap().to_string();

    // The first poll claims it.
    let resp = app
        .request(
            "GET",
            "/api/agent/jobs",
            None,
            Some(&license.key),
            Some("server-1"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["job_id"], job_id.as_str());
    assert_eq!(resp.json["printer_uid"], "HP1");
    assert_eq!(resp.json["content"], "base64xyz");

    // A second immediate poll comes back empty (JSON null).
    let resp = app
        .request(
            "GET",
            "/api/agent/jobs",
            None,
            Some(&license.key),
            Some("server-1"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json.is_null());

    // The agent reports done.
    let resp = app
        .request(
            "POST",
            "/api/jobs/status",
            Some(serde_json::json!({"job_id": job_id, "status": "done"})),
            Some(&license.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["ok"], true);

    // A duplicate report is accepted quietly.
    let resp = app
        .request(
            "POST",
            "/api/jobs/status",
            Some(serde_json::json!({"job_id": job_id, "status": "done"})),
            Some(&license.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    // A report under a different license is a 404.
    let other = app.create_license(1).await;
    let resp = app
        .request(
            "POST",
            "/api/jobs/status",
            Some(serde_json::json!({"job_id": job_id, "status": "done"})),
            Some(&other.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json["error"], "Job not found");
}

#[tokio::test]
async fn concurrent_polls_claim_each_job_exactly_once() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    let mut queued = HashSet::new();
    for i in 0..3 {
        let resp = app
            .request(
                "POST",
                "/api/print/jobs",
                Some(serde_json::json!({"printer_uid": "HP1", "content": format!("payload-{i}")})),
                Some(&license.key),
                None,
            )
            .await;
        queued.insert(resp.json["job_id"].as_str().unwrap().to_string());
    }

    // Eight pollers race for three jobs.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let key = license.key.clone();
        handles.push(tokio::spawn(async move {
            use axum::body::Body;
            use axum::http::Request;
            use tower::ServiceExt;

            let request = Request::builder()
                .method("GET")
                .uri("/api/agent/jobs")
                .header("X-License-Key", &key)
                .header("X-Server-ID", "server-1")
                .body(Body::empty())
                .unwrap();
            let response = router.oneshot(request).await.unwrap();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            serde_json::from_slice::<serde_json::Value>(&bytes).unwrap()
        }));
    }

    let mut claimed = Vec::new();
    let mut empty = 0;
    for handle in handles {
        let json = handle.await.unwrap();
        if json.is_null() {
            empty += 1;
        } else {
            claimed.push(json["job_id"].as_str().unwrap().to_string());
        }
    }

    let distinct: HashSet<String> = claimed.iter().cloned().collect();
    assert_eq!(distinct.len(), 3, "each job went to exactly one poller");
    assert_eq!(distinct, queued);
    assert_eq!(empty, 5, "excess pollers saw an empty queue");
}

#[tokio::test]
async fn enqueue_meters_usage_even_for_unknown_printers() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    // No printer named GHOST is registered; the job queues anyway.
    let resp = app
        .request(
            "POST",
            "/api/print/jobs",
            Some(serde_json::json!({"printer_uid": "GHOST", "content": "AAAA"})),
            Some(&license.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    use cloudprint_database::store::LicenseStore;
    let metered = app
        .store
        .find_by_key(&license.key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(metered.print_count, 1);
}

#[tokio::test]
async fn report_for_an_unknown_job_is_404() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    let resp = app
        .request(
            "POST",
            "/api/jobs/status",
            Some(serde_json::json!({
                "job_id": uuid::Uuid::new_v4(),
                "status": "error",
                "error": "printer on fire",
            })),
            Some(&license.key),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json["code"], "not_found");
}
