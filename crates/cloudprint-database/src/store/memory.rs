//! In-process store using a Tokio mutex, for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use cloudprint_core::error::AppError;
use cloudprint_core::result::AppResult;
use cloudprint_entity::job::{JobStatus, PrintJob};
use cloudprint_entity::license::{License, NewLicense};
use cloudprint_entity::printer::{NewPrinter, Printer};

use super::{JobStore, LicenseStore, PrinterStore};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct Inner {
    licenses: Vec<License>,
    printers: Vec<Printer>,
    jobs: Vec<PrintJob>,
}

/// In-memory store backend.
///
/// A single mutex guards all three aggregates, which makes the claim
/// read-then-flip and the registration delete-then-insert atomic with
/// respect to every other operation. Suitable for a single node only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status of a job, if it exists. Introspection for the dev
    /// profile and tests.
    pub async fn job_status(&self, job_id: Uuid) -> Option<JobStatus> {
        let state = self.state.lock().await;
        state.jobs.iter().find(|j| j.id == job_id).map(|j| j.status)
    }
}

#[async_trait]
impl LicenseStore for MemoryStore {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<License>> {
        let state = self.state.lock().await;
        Ok(state.licenses.iter().find(|l| l.key == key).cloned())
    }

    async fn create(&self, data: &NewLicense) -> AppResult<License> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let license = License {
            id: Uuid::new_v4(),
            key: NewLicense::generate_key(),
            customer: data.customer.clone(),
            active: true,
            expiration_date: data.expiration_date,
            server_limit: data.server_limit,
            print_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.licenses.push(license.clone());
        info!(customer = %license.customer, "License provisioned");
        Ok(license)
    }

    async fn list(&self) -> AppResult<Vec<License>> {
        let state = self.state.lock().await;
        Ok(state.licenses.clone())
    }

    async fn set_active(&self, key: &str, active: bool) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.licenses.iter_mut().find(|l| l.key == key) {
            Some(license) => {
                license.active = active;
                license.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_expiration(&self, key: &str, expiration: Option<NaiveDate>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.licenses.iter_mut().find(|l| l.key == key) {
            Some(license) => {
                license.expiration_date = expiration;
                license.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PrinterStore for MemoryStore {
    async fn replace_for_server(
        &self,
        license: &License,
        server_uid: &str,
        printers: &[NewPrinter],
    ) -> AppResult<usize> {
        let mut state = self.state.lock().await;

        let mut known: Vec<&str> = state
            .printers
            .iter()
            .filter(|p| p.license_id == license.id)
            .map(|p| p.server_uid.as_str())
            .collect();
        known.sort_unstable();
        known.dedup();

        if !known.contains(&server_uid) && known.len() >= license.server_limit as usize {
            return Err(AppError::quota_exceeded(format!(
                "Plan limit reached. Max {} print servers allowed.",
                license.server_limit
            )));
        }

        state
            .printers
            .retain(|p| !(p.license_id == license.id && p.server_uid == server_uid));

        let now = Utc::now();
        for printer in printers {
            // Mirror the database upsert: last entry wins on a duplicate uid.
            state.printers.retain(|p| {
                !(p.license_id == license.id
                    && p.server_uid == server_uid
                    && p.uid == printer.uid)
            });
            state.printers.push(Printer {
                id: Uuid::new_v4(),
                license_id: license.id,
                server_uid: server_uid.to_string(),
                uid: printer.uid.clone(),
                name: printer.name.clone(),
                last_poll: None,
                created_at: now,
            });
        }

        Ok(printers.len())
    }

    async fn touch(&self, license_id: Uuid, server_uid: &str) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut touched = 0;
        for printer in state
            .printers
            .iter_mut()
            .filter(|p| p.license_id == license_id && p.server_uid == server_uid)
        {
            printer.last_poll = Some(now);
            touched += 1;
        }
        Ok(touched)
    }

    async fn list(&self, license_id: Uuid, server_uid: Option<&str>) -> AppResult<Vec<Printer>> {
        let state = self.state.lock().await;
        let mut printers: Vec<Printer> = state
            .printers
            .iter()
            .filter(|p| {
                p.license_id == license_id
                    && server_uid.is_none_or(|uid| p.server_uid == uid)
            })
            .cloned()
            .collect();
        printers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(printers)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn enqueue(
        &self,
        license_id: Uuid,
        printer_uid: &str,
        content: &str,
    ) -> AppResult<PrintJob> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let job = PrintJob {
            id: Uuid::new_v4(),
            license_id,
            printer_uid: printer_uid.to_string(),
            content: content.to_string(),
            status: JobStatus::Queued,
            error: None,
            created_at: now,
            updated_at: now,
        };
        state.jobs.push(job.clone());
        if let Some(license) = state.licenses.iter_mut().find(|l| l.id == license_id) {
            license.print_count += 1;
            license.updated_at = now;
        }
        Ok(job)
    }

    async fn claim_next(&self, license_id: Uuid) -> AppResult<Option<PrintJob>> {
        // The single lock serializes concurrent claims: the flip to
        // assigned happens before any other caller can look.
        let mut state = self.state.lock().await;
        let next = state
            .jobs
            .iter_mut()
            .filter(|j| j.license_id == license_id && j.status.is_claimable())
            .min_by_key(|j| j.created_at);
        match next {
            Some(job) => {
                job.status = JobStatus::Assigned;
                job.updated_at = Utc::now();
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn report(
        &self,
        license_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
        error: Option<&str>,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id && j.license_id == license_id)
        {
            Some(job) => {
                job.status = status;
                job.error = error.map(String::from);
                job.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    async fn active_license(store: &MemoryStore, server_limit: i32) -> License {
        store
            .create(&NewLicense {
                customer: "Acme Corp".to_string(),
                expiration_date: None,
                server_limit,
            })
            .await
            .unwrap()
    }

    fn entries(uids: &[&str]) -> Vec<NewPrinter> {
        uids.iter()
            .map(|uid| NewPrinter {
                uid: uid.to_string(),
                name: uid.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn registration_replaces_the_whole_set() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        store
            .replace_for_server(&license, "server-1", &entries(&["A", "B"]))
            .await
            .unwrap();
        store
            .replace_for_server(&license, "server-1", &entries(&["C"]))
            .await
            .unwrap();

        let printers = PrinterStore::list(&store, license.id, None).await.unwrap();
        let uids: Vec<&str> = printers.iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["C"]);
    }

    #[tokio::test]
    async fn quota_failure_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        store
            .replace_for_server(&license, "server-1", &entries(&["A"]))
            .await
            .unwrap();

        let err = store
            .replace_for_server(&license, "server-2", &entries(&["B"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, cloudprint_core::error::ErrorKind::QuotaExceeded);

        let printers = PrinterStore::list(&store, license.id, None).await.unwrap();
        assert_eq!(printers.len(), 1);
        assert_eq!(printers[0].server_uid, "server-1");
    }

    #[tokio::test]
    async fn re_registration_of_a_known_server_passes_the_quota() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        store
            .replace_for_server(&license, "server-1", &entries(&["A"]))
            .await
            .unwrap();
        // Same server again: not a new slot, so the limit does not apply.
        store
            .replace_for_server(&license, "server-1", &entries(&["A", "B"]))
            .await
            .unwrap();

        let printers = PrinterStore::list(&store, license.id, None).await.unwrap();
        assert_eq!(printers.len(), 2);
    }

    #[tokio::test]
    async fn enqueue_meters_print_count() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        store.enqueue(license.id, "HP1", "AAAA").await.unwrap();
        store.enqueue(license.id, "HP1", "BBBB").await.unwrap();

        let license = store.find_by_key(&license.key).await.unwrap().unwrap();
        assert_eq!(license.print_count, 2);
    }

    #[tokio::test]
    async fn concurrent_claims_hand_out_each_job_exactly_once() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        let mut queued = HashSet::new();
        for i in 0..3 {
            let job = store
                .enqueue(license.id, "HP1", &format!("payload-{i}"))
                .await
                .unwrap();
            queued.insert(job.id);
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let license_id = license.id;
            handles.push(tokio::spawn(
                async move { store.claim_next(license_id).await },
            ));
        }

        let mut claimed = Vec::new();
        let mut empty = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                Some(job) => {
                    assert_eq!(job.status, JobStatus::Assigned);
                    claimed.push(job.id);
                }
                None => empty += 1,
            }
        }

        let distinct: HashSet<Uuid> = claimed.iter().copied().collect();
        assert_eq!(distinct.len(), 3, "each job claimed exactly once");
        assert_eq!(distinct, queued);
        assert_eq!(empty, 5, "excess pollers get an empty claim");
    }

    #[tokio::test]
    async fn claims_follow_creation_order() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;

        let first = store.enqueue(license.id, "HP1", "AAAA").await.unwrap();
        let second = store.enqueue(license.id, "HP1", "BBBB").await.unwrap();

        let a = store.claim_next(license.id).await.unwrap().unwrap();
        let b = store.claim_next(license.id).await.unwrap().unwrap();
        assert_eq!(a.id, first.id);
        assert_eq!(b.id, second.id);
        assert!(store.claim_next(license.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn report_is_an_idempotent_overwrite() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;
        let job = store.enqueue(license.id, "HP1", "AAAA").await.unwrap();
        store.claim_next(license.id).await.unwrap().unwrap();

        assert!(
            store
                .report(license.id, job.id, JobStatus::Done, None)
                .await
                .unwrap()
        );
        // A duplicate report from a retrying agent succeeds quietly.
        assert!(
            store
                .report(license.id, job.id, JobStatus::Done, None)
                .await
                .unwrap()
        );
        assert_eq!(store.job_status(job.id).await, Some(JobStatus::Done));
    }

    #[tokio::test]
    async fn report_under_the_wrong_license_finds_nothing() {
        let store = MemoryStore::new();
        let license = active_license(&store, 1).await;
        let other = active_license(&store, 1).await;
        let job = store.enqueue(license.id, "HP1", "AAAA").await.unwrap();

        assert!(
            !store
                .report(other.id, job.id, JobStatus::Done, None)
                .await
                .unwrap()
        );
        assert_eq!(store.job_status(job.id).await, Some(JobStatus::Queued));
    }
}
