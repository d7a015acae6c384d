//! Deterministic agent identity.
//!
//! The backend groups printers by `server_uid`, so the identity must be
//! stable per machine and per license across restarts.

use sha2::{Digest, Sha256};

/// Derive the agent's `server_uid` from the local hostname and the
/// license key.
pub fn derive_server_uid(license_key: &str) -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown-host".to_string());
    server_uid_for(&host, license_key)
}

fn server_uid_for(host: &str, license_key: &str) -> String {
    let digest = Sha256::digest(format!("{host}-{license_key}").as_bytes());
    format!("server-{}", &hex::encode(digest)[..8])
}
