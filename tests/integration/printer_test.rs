//! Printer registry: replace semantics, the server quota, entry
//! normalization, and read-time liveness.

use axum::http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn second_registration_replaces_the_first() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    let resp = app
        .register_printers(&license.key, "server-1", &["A", "B"])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["ok"], true);

    app.register_printers(&license.key, "server-1", &["C"]).await;

    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let listed = resp.json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["uid"], "C");
}

#[tokio::test]
async fn second_server_hits_the_quota_and_mutates_nothing() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    app.register_printers(&license.key, "server-1", &["A"]).await;

    let resp = app
        .register_printers(&license.key, "server-2", &["B"])
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.json["code"], "limit_reached");

    // The store is unchanged: server-1's printer is still the only one.
    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    let listed = resp.json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["server_uid"], "server-1");
}

#[tokio::test]
async fn a_higher_limit_admits_a_second_server() {
    let app = TestApp::new();
    let license = app.create_license(2).await;

    app.register_printers(&license.key, "server-1", &["A"]).await;
    let resp = app
        .register_printers(&license.key, "server-2", &["B"])
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    // server_uid query filter narrows the listing.
    let resp = app
        .request(
            "GET",
            "/api/printers?server_uid=server-2",
            None,
            Some(&license.key),
            None,
        )
        .await;
    let listed = resp.json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["uid"], "B");
}

#[tokio::test]
async fn entries_are_normalized_and_empty_ones_skipped() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    let resp = app
        .request(
            "POST",
            "/api/agent/printers",
            Some(serde_json::json!({
                "server_uid": "server-1",
                "printers": [
                    "Legacy String Printer",
                    {"os_id": "P1", "name": "Front Desk"},
                    {"name": "Name Only"},
                    {"os_id": "IdOnly"},
                    {},
                ],
            })),
            Some(&license.key),
            Some("server-1"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    let listed = resp.json.as_array().unwrap();
    let mut uids: Vec<&str> = listed.iter().map(|p| p["uid"].as_str().unwrap()).collect();
    uids.sort_unstable();
    assert_eq!(uids, vec!["IdOnly", "Legacy String Printer", "Name Only", "P1"]);
}

#[tokio::test]
async fn liveness_follows_the_poll_cycle() {
    let app = TestApp::new();
    let license = app.create_license(1).await;

    app.register_printers(&license.key, "server-1", &["A"]).await;

    // Freshly registered, never polled: offline.
    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    assert_eq!(resp.json[0]["status"], "offline");

    // A job fetch with X-Server-ID stamps last_poll on the whole set.
    app.request(
        "GET",
        "/api/agent/jobs",
        None,
        Some(&license.key),
        Some("server-1"),
    )
    .await;

    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    assert_eq!(resp.json[0]["status"], "online");
}
