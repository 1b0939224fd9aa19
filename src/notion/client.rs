use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::error::QueueError;
use super::types::{Page, QueryResponse, due_query_body, status_update_body};
use crate::config::RunnerConfig;
use crate::state_machine::{Job, StatusUpdate};

const NOTION_VERSION: &str = "2022-06-28";

/// The task queue as seen by the orchestrator.
pub trait TaskQueue {
    /// Queued jobs due on or before `today`. Read-only.
    async fn list_due(&self, today: NaiveDate) -> Result<Vec<Job>, QueueError>;

    /// Overwrite the fields present in `update`; absent fields are untouched.
    async fn update_status(&self, job_id: &str, update: &StatusUpdate) -> Result<(), QueueError>;
}

/// REST client for a Notion database used as the job queue.
pub struct NotionClient {
    token: String,
    database_id: String,
    client: Client,
    base_url: String,
}

impl NotionClient {
    pub fn from_config(config: &RunnerConfig) -> Result<Self, QueueError> {
        Self::with_base_url(
            config.notion_token.expose().to_string(),
            config.notion_database_id.clone(),
            config.notion_base_url.clone(),
            config.request_timeout(),
        )
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(
        token: String,
        database_id: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, QueueError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            token,
            database_id,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .header("content-type", "application/json")
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, QueueError> {
        let response = self.authorized(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(QueueError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn query_page(
        &self,
        today: NaiveDate,
        cursor: Option<&str>,
    ) -> Result<QueryResponse, QueueError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        let body = due_query_body(today, cursor);
        let response = self.send(self.client.post(url).json(&body)).await?;
        Ok(response.json::<QueryResponse>().await?)
    }
}

/// Decode raw records, skipping any that do not look like a page.
fn decode_pages(results: Vec<Value>) -> Vec<Job> {
    results
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Page>(raw) {
            Ok(page) => Some(page.to_job()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable queue record");
                None
            }
        })
        .collect()
}

impl TaskQueue for NotionClient {
    async fn list_due(&self, today: NaiveDate) -> Result<Vec<Job>, QueueError> {
        let mut jobs = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.query_page(today, cursor.as_deref()).await?;
            jobs.extend(decode_pages(page.results));
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }
        tracing::debug!(count = jobs.len(), %today, "listed due jobs");
        Ok(jobs)
    }

    async fn update_status(&self, job_id: &str, update: &StatusUpdate) -> Result<(), QueueError> {
        let url = format!("{}/pages/{job_id}", self.base_url);
        let body = status_update_body(update);
        self.send(self.client.patch(url).json(&body)).await?;
        tracing::debug!(job_id, status = %update.status, "status written");
        Ok(())
    }
}
