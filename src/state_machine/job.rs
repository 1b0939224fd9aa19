use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::JobStatus;

/// Notes longer than this many characters are cut before reaching the queue.
pub const NOTE_LIMIT: usize = 2000;

/// How a finished job may be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishMode {
    /// Publish without review when the confidence gate passes.
    Auto,
    /// Always hand the result to a human.
    NeedsReview,
}

impl PublishMode {
    /// Anything other than an explicit `"Auto"` means review.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Auto") => PublishMode::Auto,
            _ => PublishMode::NeedsReview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PublishMode::Auto => "Auto",
            PublishMode::NeedsReview => "Needs Review",
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a job's input list. Entries without a URL are kept so the
/// ordering matches the queue record, but contribute nothing to the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRef {
    pub url: Option<String>,
}

impl InputRef {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// A unit of work read from the task queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub agent_type: Option<String>,
    pub context: Option<String>,
    pub inputs: Vec<InputRef>,
    pub publish_mode: PublishMode,
    /// Per-job threshold in [0, 1]; `None` falls back to the run default.
    pub confidence_gate: Option<f64>,
    pub due: Option<NaiveDate>,
    pub status: JobStatus,
}

impl Job {
    /// A queued job with only the required fields set.
    pub fn queued(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            agent_type: None,
            context: None,
            inputs: Vec::new(),
            publish_mode: PublishMode::NeedsReview,
            confidence_gate: None,
            due: None,
            status: JobStatus::Queued,
        }
    }

    pub fn gate_or(&self, default_gate: f64) -> f64 {
        self.confidence_gate.unwrap_or(default_gate)
    }

    /// Non-empty input URLs in their original order.
    pub fn input_urls(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .filter_map(|input| input.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// What the model produced for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub text: String,
    /// Expected in [0, 1] but not validated.
    pub confidence: f64,
    pub title: Option<String>,
}

impl ModelResult {
    /// The degraded result returned instead of an error.
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self {
            text: format!("[MODEL ERROR]\n{reason}"),
            confidence: 0.0,
            title: None,
        }
    }
}

/// Where the generated document was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub url: String,
}

impl ProofArtifact {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Placeholder links start with `about:blank`.
    pub fn is_placeholder(&self) -> bool {
        self.url.starts_with("about:blank")
    }
}

/// A partial write to a queue record. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    pub proof_url: Option<String>,
    pub confidence: Option<f64>,
    pub note: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            proof_url: None,
            confidence: None,
            note: None,
        }
    }

    pub fn with_proof(mut self, proof: &ProofArtifact) -> Self {
        self.proof_url = Some(proof.url.clone());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach a note, truncated to [`NOTE_LIMIT`] characters.
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(truncate_chars(note, NOTE_LIMIT).to_string());
        self
    }
}

/// Cut `s` to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
