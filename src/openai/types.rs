//! Request and response bodies for the chat completions endpoint.

use serde::{Deserialize, Serialize};

/// Body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// One message of the conversation: "system", "user" or "assistant".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

/// `content` is null when the model refused or only called tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_api_shape() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn response_deserializes_from_api_format() {
        let api_json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"text\":\"hi\"}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 3}
        }"#;
        let resp: ChatResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.first_text(), Some(r#"{"text":"hi"}"#));
    }

    #[test]
    fn null_content_yields_no_text() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), None);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
