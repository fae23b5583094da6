mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::traits::{Completion, Message};
use client::{OpenAiClient, OPENAI_API_URL};

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1000,
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        OpenAiClient::new(&self.api_key, self.base_url.as_deref().unwrap_or(OPENAI_API_URL))
    }

    fn request(&self, messages: &[Message]) -> types::ChatRequest {
        let mut request = messages
            .iter()
            .fold(types::ChatRequest::new(&self.model), |req, msg| {
                req.message(types::WireMessage::from(msg))
            });

        if types::uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(self.max_tokens);
        } else {
            request = request
                .max_tokens(self.max_tokens)
                .temperature(self.temperature);
        }
        request
    }

    /// Send a conversation and return the first choice's text, trimmed.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let response = self.client().chat(&self.request(messages)).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }

    /// Simple chat completion (convenience method).
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        self.chat(&[Message::system(system), Message::user(user)])
            .await
    }
}

#[async_trait]
impl Completion for OpenAi {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat_completion(system, prompt).await
    }
}
