//! The generative-model collaborator.
//!
//! [`ContentGenerator::generate`] is infallible by contract: every provider
//! failure is folded into a zero-confidence [`ModelResult`] so the job still
//! reaches a terminal status and lands in review.

use super::client::{ChatSender, OpenAiClient};
use super::error::ModelError;
use super::parse::{DEFAULT_CONFIDENCE, parse_model_output};
use super::types::{ChatMessage, ChatRequest};
use crate::config::RunnerConfig;
use crate::prompt::compose;
use crate::state_machine::{ModelResult, truncate_chars};

const OFFLINE_PROMPT_CHARS: usize = 2000;

pub trait ContentGenerator {
    async fn generate(&self, prompt: &str) -> ModelResult;
}

/// Calls a real provider through a [`ChatSender`].
pub struct LiveGenerator<S> {
    sender: S,
    persona: String,
    model: String,
    temperature: f32,
}

impl<S: ChatSender> LiveGenerator<S> {
    pub fn new(sender: S, persona: String, model: String, temperature: f32) -> Self {
        Self {
            sender,
            persona,
            model,
            temperature,
        }
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        let chat = compose(&self.persona, prompt);
        ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![ChatMessage::system(chat.system), ChatMessage::user(chat.user)],
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<ModelResult, ModelError> {
        let raw = self.sender.complete(&self.request(prompt)).await?;
        parse_model_output(&raw)
    }
}

impl<S: ChatSender> ContentGenerator for LiveGenerator<S> {
    async fn generate(&self, prompt: &str) -> ModelResult {
        match self.try_generate(prompt).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "model call failed");
                ModelResult::failed(e)
            }
        }
    }
}

/// Deterministic stand-in used when no provider is configured.
pub struct OfflineGenerator;

impl ContentGenerator for OfflineGenerator {
    async fn generate(&self, prompt: &str) -> ModelResult {
        ModelResult {
            text: format!(
                "[OFFLINE DUMMY OUTPUT]\n\n{}",
                truncate_chars(prompt, OFFLINE_PROMPT_CHARS)
            ),
            confidence: DEFAULT_CONFIDENCE,
            title: None,
        }
    }
}

/// The generator chosen at startup.
pub enum Generator {
    Live(LiveGenerator<OpenAiClient>),
    Offline(OfflineGenerator),
}

impl Generator {
    pub fn from_config(config: &RunnerConfig, persona: String) -> Result<Self, ModelError> {
        if config.is_offline() {
            tracing::info!("model offline, using stub output");
            return Ok(Generator::Offline(OfflineGenerator));
        }
        let client = OpenAiClient::from_config(config)?;
        Ok(Generator::Live(LiveGenerator::new(
            client,
            persona,
            config.openai_model.clone(),
            config.temperature,
        )))
    }
}

impl ContentGenerator for Generator {
    async fn generate(&self, prompt: &str) -> ModelResult {
        match self {
            Generator::Live(live) => live.generate(prompt).await,
            Generator::Offline(offline) => offline.generate(prompt).await,
        }
    }
}
