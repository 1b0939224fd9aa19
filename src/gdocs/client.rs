use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::error::PublishError;

pub const DOCS_API_URL: &str = "https://docs.googleapis.com/v1";
pub const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedDocument {
    document_id: String,
}

/// Thin wrapper over the Docs and Drive REST endpoints the publisher uses.
pub struct DocsClient {
    client: Client,
    docs_base: String,
    drive_base: String,
}

impl DocsClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_urls(client, DOCS_API_URL.to_string(), DRIVE_API_URL.to_string())
    }

    /// Point both APIs at custom base URLs (useful for testing).
    pub fn with_base_urls(client: Client, docs_base: String, drive_base: String) -> Self {
        Self {
            client,
            docs_base: docs_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, req: RequestBuilder, token: &str) -> Result<reqwest::Response, PublishError> {
        let response = req.bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PublishError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Create an empty document and return its id.
    pub async fn create_document(&self, token: &str, title: &str) -> Result<String, PublishError> {
        let req = self
            .client
            .post(format!("{}/documents", self.docs_base))
            .json(&json!({ "title": title }));
        let created: CreatedDocument = self.send(req, token).await?.json().await?;
        Ok(created.document_id)
    }

    /// Insert `text` at the start of the document body.
    pub async fn insert_text(&self, token: &str, doc_id: &str, text: &str) -> Result<(), PublishError> {
        let req = self
            .client
            .post(format!("{}/documents/{doc_id}:batchUpdate", self.docs_base))
            .json(&json!({
                "requests": [
                    {"insertText": {"location": {"index": 1}, "text": text}}
                ]
            }));
        self.send(req, token).await?;
        Ok(())
    }

    pub async fn move_to_folder(&self, token: &str, doc_id: &str, folder_id: &str) -> Result<(), PublishError> {
        let req = self
            .client
            .patch(format!("{}/files/{doc_id}", self.drive_base))
            .query(&[("addParents", folder_id), ("fields", "id, parents")])
            .json(&json!({}));
        self.send(req, token).await?;
        Ok(())
    }

    /// Anyone with the link may read.
    pub async fn share_public(&self, token: &str, doc_id: &str) -> Result<(), PublishError> {
        let req = self
            .client
            .post(format!("{}/files/{doc_id}/permissions", self.drive_base))
            .query(&[("fields", "id")])
            .json(&json!({"type": "anyone", "role": "reader"}));
        self.send(req, token).await?;
        Ok(())
    }
}

pub fn document_url(doc_id: &str) -> String {
    format!("https://docs.google.com/document/d/{doc_id}/edit")
}
