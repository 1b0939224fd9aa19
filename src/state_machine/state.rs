use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::job::Job;

/// Lifecycle status of a queued job.
///
/// Each job selected by a run flows through: Queued → Running → {Done | NeedsReview}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    NeedsReview,
}

impl JobStatus {
    /// The select option name used by the task queue.
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Running => "Running",
            JobStatus::Done => "Done",
            JobStatus::NeedsReview => "Needs Review",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Queued" => Some(JobStatus::Queued),
            "Running" => Some(JobStatus::Running),
            "Done" => Some(JobStatus::Done),
            "Needs Review" => Some(JobStatus::NeedsReview),
            _ => None,
        }
    }

    /// Terminal statuses are absorbing for the rest of the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::NeedsReview)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Done => write!(f, "Done"),
            JobStatus::NeedsReview => write!(f, "NeedsReview"),
        }
    }
}

/// A status change the state machine refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job {job_id} cannot move from {from} to {to}")]
pub struct TransitionError {
    pub job_id: String,
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Guards the status transitions of a [`Job`].
pub struct StateMachine;

impl StateMachine {
    /// Whether `from → to` is a legal edge.
    ///
    /// - `Queued` may only move to `Running`.
    /// - `Running` may only move to a terminal status.
    /// - Terminal statuses accept nothing.
    pub fn allows(from: JobStatus, to: JobStatus) -> bool {
        match from {
            JobStatus::Queued => to == JobStatus::Running,
            JobStatus::Running => to.is_terminal(),
            JobStatus::Done | JobStatus::NeedsReview => false,
        }
    }

    /// Apply a transition to the job, or refuse it without touching the job.
    pub fn advance(job: &mut Job, to: JobStatus) -> Result<JobStatus, TransitionError> {
        if !Self::allows(job.status, to) {
            return Err(TransitionError {
                job_id: job.id.clone(),
                from: job.status,
                to,
            });
        }
        job.status = to;
        Ok(to)
    }
}
