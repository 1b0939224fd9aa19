use thiserror::Error;

/// Failures inside the document publisher. Only [`PublishError::InvalidKey`]
/// escapes (at startup); the rest become placeholder URLs.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    #[error("token exchange failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Google API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<jsonwebtoken::errors::Error> for PublishError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        PublishError::InvalidKey(e.to_string())
    }
}
