//! Print job status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a print job.
///
/// Transitions are linear: queued → assigned → {done, error}. A job is
/// claimable only while queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "print_job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for an agent to claim it.
    Queued,
    /// Claimed by exactly one agent poll.
    Assigned,
    /// Printed successfully.
    Done,
    /// Failed at the agent (sink or decode error).
    Error,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Check if the job can still be claimed by a polling agent.
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Assigned => "assigned",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The terminal outcome an agent may report for a claimed job.
///
/// Restricting this at the type level means a report can never move a job
/// back into a claimable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Printed successfully.
    Done,
    /// Failed at the agent.
    Error,
}

impl ReportStatus {
    /// The job status this report resolves to.
    pub fn as_job_status(&self) -> JobStatus {
        match self {
            Self::Done => JobStatus::Done,
            Self::Error => JobStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_queued_is_claimable() {
        assert!(JobStatus::Queued.is_claimable());
        assert!(!JobStatus::Assigned.is_claimable());
        assert!(!JobStatus::Done.is_claimable());
        assert!(!JobStatus::Error.is_claimable());
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Assigned.is_terminal());
    }

    #[test]
    fn report_resolves_to_terminal_status() {
        assert_eq!(ReportStatus::Done.as_job_status(), JobStatus::Done);
        assert_eq!(ReportStatus::Error.as_job_status(), JobStatus::Error);
    }
}
