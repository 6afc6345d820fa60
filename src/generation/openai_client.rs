//! OpenAI-compatible chat completions backend

use crate::generation::{
    GenerationConfig, GenerationError, GenerationResponse, TextGenerator, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Generator backed by `POST {base_url}/v1/chat/completions`
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    auth_header: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
}

impl OpenAiGenerator {
    /// Create a generator from configuration and an API key
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn request_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            warn!("Generation request timed out after {}s: {}", self.timeout_secs, e);
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Transport(e.to_string())
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        let url = self.chat_completions_url();
        debug!("POST {} (model {}, prompt length {})", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .map(|envelope| envelope.error.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()));
            warn!("Generation request failed with {}: {}", status, message);
            return Err(GenerationError::api_status(status.as_u16(), message));
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<GenerationResponse, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".to_string()))?;

    // Refusals and tool calls come back without text content
    let content = choice.message.content.ok_or_else(|| {
        GenerationError::MalformedResponse("choice has no text content".to_string())
    })?;

    let mut response = GenerationResponse::new(content);
    if let Some(model) = parsed.model {
        response = response.with_model(model);
    }
    if let Some(usage) = parsed.usage {
        response = response.with_usage(TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        });
    }

    Ok(response)
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
