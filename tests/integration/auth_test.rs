//! License gating: every protected endpoint short-circuits on a bad
//! credential with a machine-readable code.

use axum::http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn missing_key_is_401_missing_key() {
    let app = TestApp::new();

    for (method, path) in [
        ("GET", "/api/agent/jobs"),
        ("GET", "/api/printers"),
        ("POST", "/api/agent/printers"),
    ] {
        let body = (method == "POST").then(|| serde_json::json!({"printers": []}));
        let resp = app.request(method, path, body, None, None).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(resp.json["code"], "missing_key", "{method} {path}");
    }
}

#[tokio::test]
async fn unknown_key_is_403_invalid_key() {
    let app = TestApp::new();
    let resp = app
        .request("GET", "/api/agent/jobs", None, Some("no-such-key"), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.json["code"], "invalid_key");
}

#[tokio::test]
async fn expired_key_is_403_expired_key() {
    let app = TestApp::new();
    let license = app.create_expired_license().await;

    let resp = app
        .request("GET", "/api/agent/jobs", None, Some(&license.key), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.json["code"], "expired_key");
}

#[tokio::test]
async fn cancelled_key_is_403_expired_key() {
    let app = TestApp::new();
    let license = app.create_cancelled_license().await;

    let resp = app
        .request("GET", "/api/printers", None, Some(&license.key), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.json["code"], "expired_key");
}

#[tokio::test]
async fn validate_endpoint_reports_license_state() {
    let app = TestApp::new();
    let active = app.create_license(1).await;
    let expired = app.create_expired_license().await;

    let resp = app
        .request(
            "POST",
            "/api/license/validate",
            Some(serde_json::json!({"license_key": active.key})),
            None,
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["valid"], true);
    assert_eq!(resp.json["customer"], "Test Customer");

    for key in [expired.key.as_str(), "no-such-key", ""] {
        let resp = app
            .request(
                "POST",
                "/api/license/validate",
                Some(serde_json::json!({"license_key": key})),
                None,
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.json["valid"], false);
    }
}

#[tokio::test]
async fn health_needs_no_credential() {
    let app = TestApp::new();
    let resp = app.request("GET", "/api/health", None, None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["status"], "ok");
}
