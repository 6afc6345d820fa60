//! Command backend - runs a local executable per prompt

use crate::generation::{GenerationError, GenerationResponse, TextGenerator};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Generator that shells out to a local executable
///
/// The prompt is appended as the last argument and stdout is taken as the
/// generated text. Useful with CLIs such as `llm` or `ollama run <model>`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl CommandGenerator {
    /// Create a generator from a command line such as `"ollama run llama3"`
    ///
    /// The command line is split on whitespace and quotes are not
    /// interpreted; use [`CommandGenerator::with_args`] for arguments that
    /// contain spaces. Returns `None` when the command line is blank.
    pub fn new(command_line: &str, timeout_secs: u64) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout_secs,
        })
    }

    /// Append arguments passed verbatim, after the command line's own
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Get the executable name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the fixed arguments placed before the prompt
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        debug!(
            "Spawning {} {:?} with prompt length: {}",
            self.program(),
            self.args(),
            prompt.len()
        );

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.program)
                .args(&self.args)
                .arg(prompt)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|e| {
            GenerationError::Internal(format!("Failed to execute {}: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", self.program, exit_code, stderr.trim());
            return Err(GenerationError::api(format!(
                "{} exited with code {}: {}",
                self.program,
                exit_code,
                stderr.trim()
            )));
        }

        let mut content = String::from_utf8(output.stdout).map_err(|e| {
            GenerationError::MalformedResponse(format!("output is not valid UTF-8: {}", e))
        })?;
        if content.ends_with('\n') {
            content.pop();
            if content.ends_with('\r') {
                content.pop();
            }
        }

        debug!("{} returned {} bytes of output", self.program, content.len());

        Ok(GenerationResponse::new(content))
    }
}
