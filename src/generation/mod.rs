//! Text-generation service clients

pub mod client;
pub mod openai_client;
pub mod response;
pub mod subprocess_client;

use anyhow::{Context, Result};
use async_trait::async_trait;
pub use client::{Backend, GenerationConfig};
pub use openai_client::OpenAiGenerator;
pub use response::{GenerationError, GenerationResponse, TokenUsage};
pub use subprocess_client::CommandGenerator;

/// Trait for text generation - allows for different implementations
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        (**self).generate(prompt).await
    }
}

/// Build the generator selected by the configuration
pub fn build_generator(config: &GenerationConfig) -> Result<Box<dyn TextGenerator>> {
    match config.backend {
        Backend::Openai => {
            let api_key = config.api_key().with_context(|| {
                format!("Environment variable {} is not set", config.api_key_env)
            })?;
            let generator = OpenAiGenerator::new(config, api_key)?;
            Ok(Box::new(generator))
        }
        Backend::Command => {
            let command_line = config
                .command
                .as_deref()
                .context("The command backend requires `generation.command`")?;
            let generator = CommandGenerator::new(command_line, config.timeout_secs)
                .context("`generation.command` is blank")?
                .with_args(config.args.iter().cloned());
            Ok(Box::new(generator))
        }
    }
}
