//! Service-account authentication for the document store.
//!
//! A signed RS256 assertion is exchanged for a short-lived bearer token at
//! the key's `token_uri`. With a subject set, the service account acts on
//! behalf of that workspace user.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::PublishError;

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str =
    "https://www.googleapis.com/auth/drive https://www.googleapis.com/auth/documents";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a service-account key file the runner needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse the key JSON and check that the private key is usable.
    pub fn from_json(json: &str) -> Result<Self, PublishError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| PublishError::InvalidKey(e.to_string()))?;
        key.encoding_key()?;
        Ok(key)
    }

    fn encoding_key(&self) -> Result<EncodingKey, PublishError> {
        Ok(EncodingKey::from_rsa_pem(self.private_key.as_bytes())?)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Mints bearer tokens for one service account.
pub struct TokenSource {
    key: ServiceAccountKey,
    subject: Option<String>,
    client: Client,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, subject: Option<String>, client: Client) -> Self {
        Self {
            key,
            subject,
            client,
        }
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, PublishError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            sub: self.subject.as_deref(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key.encoding_key()?,
        )?;
        Ok(token)
    }

    pub async fn access_token(&self) -> Result<String, PublishError> {
        let assertion = self.assertion(Utc::now())?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PublishError::Auth {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<TokenResponse>().await?.access_token)
    }
}
