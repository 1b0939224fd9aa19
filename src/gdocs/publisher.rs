use reqwest::Client;

use super::auth::{ServiceAccountKey, TokenSource};
use super::client::{DocsClient, document_url};
use super::error::PublishError;
use crate::config::RunnerConfig;
use crate::state_machine::{ProofArtifact, truncate_chars};

/// Error text embedded in a placeholder link is cut to this many characters.
const ERROR_DETAIL_CHARS: usize = 200;

/// Publishes a generated document and returns where it lives.
///
/// Never fails: an unusable backend yields a placeholder link.
pub trait Publisher {
    async fn publish(&self, title: &str, body: &str) -> ProofArtifact;
}

/// Publishes to Google Docs, optionally filing into a folder and sharing.
pub struct GoogleDocsPublisher {
    tokens: TokenSource,
    docs: DocsClient,
    parent_folder: Option<String>,
    share_public: bool,
}

impl GoogleDocsPublisher {
    pub fn new(
        tokens: TokenSource,
        docs: DocsClient,
        parent_folder: Option<String>,
        share_public: bool,
    ) -> Self {
        Self {
            tokens,
            docs,
            parent_folder,
            share_public,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Result<Self, PublishError> {
        let key = ServiceAccountKey::from_json(config.drive_sa_json.expose())?;
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(
            TokenSource::new(key, config.google_impersonate.clone(), client.clone()),
            DocsClient::new(client),
            config.gdrive_parent_folder_id.clone(),
            config.share_public,
        ))
    }

    async fn try_publish(&self, title: &str, body: &str) -> Result<String, PublishError> {
        let token = self.tokens.access_token().await?;
        let doc_id = self.docs.create_document(&token, title).await?;
        self.docs.insert_text(&token, &doc_id, body).await?;
        if let Some(folder) = &self.parent_folder {
            self.docs.move_to_folder(&token, &doc_id, folder).await?;
        }
        if self.share_public {
            self.docs.share_public(&token, &doc_id).await?;
        }
        Ok(document_url(&doc_id))
    }
}

impl Publisher for GoogleDocsPublisher {
    async fn publish(&self, title: &str, body: &str) -> ProofArtifact {
        match self.try_publish(title, body).await {
            Ok(url) => ProofArtifact::new(url),
            Err(e) => {
                tracing::error!(error = %e, title, "document publish failed");
                let detail = e.to_string();
                ProofArtifact::new(format!(
                    "about:blank#error={}",
                    truncate_chars(&detail, ERROR_DETAIL_CHARS)
                ))
            }
        }
    }
}

/// Used when no document store is configured.
pub struct PlaceholderPublisher;

impl Publisher for PlaceholderPublisher {
    async fn publish(&self, title: &str, _body: &str) -> ProofArtifact {
        tracing::warn!(title, "document store not configured, returning placeholder proof URL");
        ProofArtifact::new(format!("about:blank#{}", title.replace(' ', "_")))
    }
}

/// The publisher chosen at startup.
pub enum DocPublisher {
    Google(GoogleDocsPublisher),
    Placeholder(PlaceholderPublisher),
}

impl DocPublisher {
    /// A malformed service-account key is a startup error, not a per-job one.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, PublishError> {
        if !config.publisher_configured() {
            return Ok(DocPublisher::Placeholder(PlaceholderPublisher));
        }
        Ok(DocPublisher::Google(GoogleDocsPublisher::from_config(config)?))
    }
}

impl Publisher for DocPublisher {
    async fn publish(&self, title: &str, body: &str) -> ProofArtifact {
        match self {
            DocPublisher::Google(google) => google.publish(title, body).await,
            DocPublisher::Placeholder(placeholder) => placeholder.publish(title, body).await,
        }
    }
}
