//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use cloudprint_api::{build_app, build_state};
use cloudprint_core::config::AppConfig;
use cloudprint_database::store::memory::MemoryStore;
use cloudprint_database::store::{
    JobStoreDispatch, LicenseStore, LicenseStoreDispatch, PrinterStoreDispatch,
};
use cloudprint_entity::license::{License, NewLicense};

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Direct store handle for seeding and assertions.
    pub store: MemoryStore,
}

/// A decoded test response.
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Parsed JSON body (`Value::Null` for empty bodies).
    pub json: Value,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = build_state(
            Arc::new(AppConfig::default()),
            LicenseStoreDispatch::Memory(store.clone()),
            PrinterStoreDispatch::Memory(store.clone()),
            JobStoreDispatch::Memory(store.clone()),
        );
        Self {
            router: build_app(state),
            store,
        }
    }

    /// Provision an active license with the given server limit.
    pub async fn create_license(&self, server_limit: i32) -> License {
        self.store
            .create(&NewLicense {
                customer: "Test Customer".to_string(),
                expiration_date: None,
                server_limit,
            })
            .await
            .expect("Failed to create license")
    }

    /// Provision a license that expired yesterday.
    pub async fn create_expired_license(&self) -> License {
        let yesterday = chrono::Utc::now().date_naive() - chrono::TimeDelta::days(1);
        self.store
            .create(&NewLicense {
                customer: "Expired Customer".to_string(),
                expiration_date: Some(yesterday),
                server_limit: 1,
            })
            .await
            .expect("Failed to create license")
    }

    /// Provision a cancelled license.
    pub async fn create_cancelled_license(&self) -> License {
        let license = self.create_license(1).await;
        self.store
            .set_active(&license.key, false)
            .await
            .expect("Failed to revoke license");
        license
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        license_key: Option<&str>,
        server_id: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(key) = license_key {
            builder = builder.header("X-License-Key", key);
        }
        if let Some(server_id) = server_id {
            builder = builder.header("X-Server-ID", server_id);
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, json }
    }

    /// Register a set of printers for `(license, server_uid)`.
    pub async fn register_printers(
        &self,
        license_key: &str,
        server_uid: &str,
        uids: &[&str],
    ) -> TestResponse {
        let printers: Vec<Value> = uids
            .iter()
            .map(|uid| serde_json::json!({"os_id": uid, "name": uid}))
            .collect();
        self.request(
            "POST",
            "/api/agent/printers",
            Some(serde_json::json!({"server_uid": server_uid, "printers": printers})),
            Some(license_key),
            Some(server_uid),
        )
        .await
    }
}
