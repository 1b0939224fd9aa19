//! Errors raised by the task queue client.
//!
//! Every variant is fatal for the run: the orchestrator never retries a
//! queue call and never continues past one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue answered with a non-success status (401 bad token, 404
    /// unknown database, 5xx outage).
    #[error("queue API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// DNS, connection, timeout or body decoding failure.
    #[error("queue transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
