//! Errors that can occur while talking to the model provider.
//!
//! None of these reach the orchestrator: the generator converts every
//! [`ModelError`] into a zero-confidence [`ModelResult`](crate::state_machine::ModelResult).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Non-success HTTP status (401 bad key, 429 quota, 5xx outage).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The provider answered but carried no assistant text.
    #[error("empty model response")]
    EmptyResponse,

    /// The assistant text did not contain a usable JSON object.
    #[error("failed to parse model output: {0}")]
    ParseError(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ModelError::ApiError {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error (status 429): quota exceeded");
    }

    #[test]
    fn parse_error_display() {
        let err = ModelError::ParseError("no JSON object found".into());
        assert_eq!(
            err.to_string(),
            "failed to parse model output: no JSON object found"
        );
    }
}
