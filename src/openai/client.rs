use std::time::Duration;

use reqwest::Client;

use super::error::ModelError;
use super::types::{ChatRequest, ChatResponse};
use crate::config::RunnerConfig;

/// Anything that can turn a chat request into assistant text.
pub trait ChatSender {
    async fn complete(&self, req: &ChatRequest) -> Result<String, ModelError>;
}

pub struct OpenAiClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_config(config: &RunnerConfig) -> Result<Self, ModelError> {
        Self::with_base_url(
            config.openai_api_key.expose().to_string(),
            config.openai_base_url.clone(),
            config.request_timeout(),
        )
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ChatSender for OpenAiClient {
    async fn complete(&self, req: &ChatRequest) -> Result<String, ModelError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<ChatResponse>().await?;
        body.first_text()
            .map(str::to_string)
            .ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::types::ChatMessage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("task")],
        }
    }

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::with_base_url("sk-test".into(), server.uri(), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn complete_returns_first_choice_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"message": {"role": "assistant", "content": "{\"text\":\"ok\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).complete(&request()).await.unwrap();
        assert_eq!(text, r#"{"text":"ok"}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server).complete(&request()).await.unwrap_err();
        match err {
            ModelError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse));
    }

    #[tokio::test]
    async fn non_json_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ModelError::NetworkError(_)));
    }
}
