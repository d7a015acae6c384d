//! Printer entity model and liveness.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A printer is considered online if its agent polled for jobs within
/// this window.
pub const ONLINE_WINDOW_SECS: i64 = 120;

/// A printer registered by an agent.
///
/// The full set for a given `(license, server_uid)` is replaced on every
/// registration call; rows not re-sent disappear.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Printer {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning license.
    pub license_id: Uuid,
    /// Identity of the agent that registered this printer.
    pub server_uid: String,
    /// OS-level printer identifier, unique within `(license, server_uid)`.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Last time the owning agent fetched jobs. `None` until the first poll.
    pub last_poll: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Printer {
    /// Liveness computed at read time, never stored.
    pub fn is_online(&self, now: DateTime<Utc>) -> bool {
        self.last_poll
            .is_some_and(|t| now - t < TimeDelta::seconds(ONLINE_WINDOW_SECS))
    }

    /// The wire representation of liveness.
    pub fn status(&self, now: DateTime<Utc>) -> &'static str {
        if self.is_online(now) { "online" } else { "offline" }
    }
}

/// A printer entry as submitted by an agent registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrinter {
    /// OS-level printer identifier.
    pub uid: String,
    /// Display name.
    pub name: String,
}

impl NewPrinter {
    /// Normalize a raw registration entry.
    ///
    /// Agents may send `os_id` or `uid` for the identifier; older agents
    /// send a bare string, which callers pass as both. An entry missing
    /// both an identifier and a name is dropped; when only one side is
    /// present it stands in for the other.
    pub fn from_parts(
        os_id: Option<String>,
        uid: Option<String>,
        name: Option<String>,
    ) -> Option<Self> {
        let id = os_id.or(uid);
        match (id, name) {
            (None, None) => None,
            (Some(uid), Some(name)) => Some(Self { uid, name }),
            (Some(uid), None) => Some(Self {
                name: uid.clone(),
                uid,
            }),
            (None, Some(name)) => Some(Self {
                uid: name.clone(),
                name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer_with_last_poll(last_poll: Option<DateTime<Utc>>) -> Printer {
        Printer {
            id: Uuid::new_v4(),
            license_id: Uuid::new_v4(),
            server_uid: "server-abc12345".to_string(),
            uid: "HP1".to_string(),
            name: "HP LaserJet".to_string(),
            last_poll,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn online_within_two_minutes() {
        let now = Utc::now();
        let p = printer_with_last_poll(Some(now - TimeDelta::seconds(90)));
        assert!(p.is_online(now));
        assert_eq!(p.status(now), "online");
    }

    #[test]
    fn offline_past_two_minutes() {
        let now = Utc::now();
        let p = printer_with_last_poll(Some(now - TimeDelta::seconds(150)));
        assert!(!p.is_online(now));
        assert_eq!(p.status(now), "offline");
    }

    #[test]
    fn offline_before_first_poll() {
        let p = printer_with_last_poll(None);
        assert!(!p.is_online(Utc::now()));
    }

    #[test]
    fn entry_normalization() {
        assert_eq!(
            NewPrinter::from_parts(Some("P1".into()), None, Some("Front Desk".into())),
            Some(NewPrinter {
                uid: "P1".into(),
                name: "Front Desk".into()
            })
        );
        // os_id wins over uid when both are present
        assert_eq!(
            NewPrinter::from_parts(Some("P1".into()), Some("P2".into()), None),
            Some(NewPrinter {
                uid: "P1".into(),
                name: "P1".into()
            })
        );
        // one present side fills in for the other
        assert_eq!(
            NewPrinter::from_parts(None, None, Some("Front Desk".into())),
            Some(NewPrinter {
                uid: "Front Desk".into(),
                name: "Front Desk".into()
            })
        );
        // missing both: skipped
        assert_eq!(NewPrinter::from_parts(None, None, None), None);
    }
}
