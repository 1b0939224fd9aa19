//! Wire types for the task queue database and the typed accessor layer.
//!
//! Queue records carry each property in one of several encodings (title,
//! rich text, select, number, files, ...). [`Page`] decodes every property by
//! the key its encoding uses, and [`Page::to_job`] translates the record into
//! a strongly-typed [`Job`] before any lifecycle logic sees it.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state_machine::{
    InputRef, Job, JobStatus, NOTE_LIMIT, PublishMode, StatusUpdate, truncate_chars,
};

pub const PROP_NAME: &str = "Name";
pub const PROP_AGENT_TYPE: &str = "AgentType";
pub const PROP_CONTEXT: &str = "Prompt / Context";
pub const PROP_INPUTS: &str = "Inputs";
pub const PROP_PUBLISH_MODE: &str = "PublishMode";
pub const PROP_GATE: &str = "ConfidenceGate";
pub const PROP_STATUS: &str = "Status";
pub const PROP_DUE: &str = "Due";
pub const PROP_PROOF_URL: &str = "ProofURL";
pub const PROP_CONFIDENCE: &str = "Confidence";
pub const PROP_PROOF_NOTE: &str = "ProofNote";

const UNTITLED: &str = "Untitled";

/// One page of a database query.
///
/// Results stay as raw JSON so a single undecodable record can be skipped
/// without losing the rest of the page.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database record.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A property value in any of the encodings the runner reads.
/// Only the key matching the property's encoding is populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyValue {
    pub title: Option<Vec<RichText>>,
    pub rich_text: Option<Vec<RichText>>,
    pub select: Option<SelectOption>,
    pub number: Option<f64>,
    pub date: Option<DateValue>,
    pub files: Option<Vec<FileRef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
}

/// A files-property entry: either hosted by the queue or an external link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileRef {
    pub external: Option<FileLink>,
    pub file: Option<FileLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileLink {
    pub url: Option<String>,
}

impl FileRef {
    /// External links win over hosted files; empty URLs count as absent.
    pub fn url(&self) -> Option<&str> {
        [&self.external, &self.file]
            .into_iter()
            .flatten()
            .filter_map(|link| link.url.as_deref())
            .find(|url| !url.is_empty())
    }
}

impl Page {
    fn prop(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// First fragment of a title property.
    pub fn title(&self, name: &str) -> Option<&str> {
        self.prop(name)?
            .title
            .as_ref()?
            .first()
            .map(|t| t.plain_text.as_str())
    }

    /// Rich-text fragments joined by newlines.
    pub fn rich_text(&self, name: &str) -> Option<String> {
        let fragments = self.prop(name)?.rich_text.as_ref()?;
        Some(
            fragments
                .iter()
                .map(|t| t.plain_text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        self.prop(name)?.select.as_ref().map(|s| s.name.as_str())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.prop(name)?.number
    }

    pub fn date(&self, name: &str) -> Option<&str> {
        self.prop(name)?.date.as_ref()?.start.as_deref()
    }

    pub fn files(&self, name: &str) -> Vec<InputRef> {
        self.prop(name)
            .and_then(|p| p.files.as_ref())
            .map(|files| {
                files
                    .iter()
                    .map(|f| f.url().map(InputRef::url).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Translate the record into a [`Job`].
    ///
    /// The status defaults to `Queued` because the due-job filter only
    /// returns queued records.
    pub fn to_job(&self) -> Job {
        let name = self
            .title(PROP_NAME)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNTITLED);

        Job {
            id: self.id.clone(),
            name: name.to_string(),
            agent_type: self.select(PROP_AGENT_TYPE).map(str::to_string),
            context: self.rich_text(PROP_CONTEXT).filter(|c| !c.is_empty()),
            inputs: self.files(PROP_INPUTS),
            publish_mode: PublishMode::from_label(self.select(PROP_PUBLISH_MODE)),
            confidence_gate: self.number(PROP_GATE),
            due: self.date(PROP_DUE).and_then(parse_due),
            status: self
                .select(PROP_STATUS)
                .and_then(JobStatus::from_label)
                .unwrap_or(JobStatus::Queued),
        }
    }
}

/// Date properties may carry a time; only the calendar day matters here.
fn parse_due(start: &str) -> Option<NaiveDate> {
    let day = start.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Filter for queued records due on or before `today`.
pub fn due_query_body(today: NaiveDate, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "filter": {
            "and": [
                {"property": PROP_STATUS, "select": {"equals": JobStatus::Queued.label()}},
                {"property": PROP_DUE, "date": {"on_or_before": today.format("%Y-%m-%d").to_string()}}
            ]
        }
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

/// Property patch for a status write. Only present fields are sent, and the
/// note never exceeds [`NOTE_LIMIT`] characters.
pub fn status_update_body(update: &StatusUpdate) -> Value {
    let mut props = serde_json::Map::new();
    props.insert(
        PROP_STATUS.to_string(),
        json!({"select": {"name": update.status.label()}}),
    );
    if let Some(url) = &update.proof_url {
        props.insert(PROP_PROOF_URL.to_string(), json!({"url": url}));
    }
    if let Some(confidence) = update.confidence {
        props.insert(PROP_CONFIDENCE.to_string(), json!({"number": confidence}));
    }
    if let Some(note) = &update.note {
        let content = truncate_chars(note, NOTE_LIMIT);
        props.insert(
            PROP_PROOF_NOTE.to_string(),
            json!({"rich_text": [{"type": "text", "text": {"content": content}}]}),
        );
    }
    json!({ "properties": props })
}
