//! Chain configuration from YAML

use crate::core::{step::StepDefinition, template};
use crate::generation::{Backend, GenerationConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Top-level chain configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain name
    pub name: String,

    /// Optional chain description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Generation service settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Steps in execution order
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Human-readable step name
    pub name: String,

    /// Prompt template with an `{input}` placeholder
    pub template: String,
}

impl ChainConfig {
    /// Load chain configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse chain configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ChainConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The built-in three-step chain: summarize, analyze, propose
    pub fn default_chain() -> Self {
        Self {
            name: "Summarize, analyze, propose".to_string(),
            description: Some(
                "Condense a text, pull out its key points, then turn them into an action plan"
                    .to_string(),
            ),
            generation: GenerationConfig::default(),
            steps: vec![
                StepConfig {
                    name: "Step 1: Summarize".to_string(),
                    template: "Summarize the following text concisely:\n\n{input}".to_string(),
                },
                StepConfig {
                    name: "Step 2: Analyze".to_string(),
                    template: "Analyze the following summary and list its three main points:\n\n{input}"
                        .to_string(),
                },
                StepConfig {
                    name: "Step 3: Propose".to_string(),
                    template: "Based on the following analysis, propose a concrete action plan:\n\n{input}"
                        .to_string(),
                },
            ],
        }
    }

    /// Validate the chain configuration
    ///
    /// Templates with zero or several placeholders are accepted with a warning.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Chain name must not be empty");
        }

        if self.steps.is_empty() {
            anyhow::bail!("Chain '{}' has no steps", self.name);
        }

        let mut seen_names = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                anyhow::bail!("Step {} has an empty name", i + 1);
            }
            if !seen_names.insert(step.name.as_str()) {
                anyhow::bail!("Duplicate step name: {}", step.name);
            }

            match template::placeholder_count(&step.template) {
                1 => {}
                0 => warn!(
                    "Step '{}' has no {} placeholder; its template is sent unchanged",
                    step.name,
                    template::PLACEHOLDER
                ),
                n => warn!(
                    "Step '{}' has {} {} placeholders; only the first is filled",
                    step.name,
                    n,
                    template::PLACEHOLDER
                ),
            }
        }

        let generation = &self.generation;
        if generation.max_tokens == 0 {
            anyhow::bail!("generation.max_tokens must be greater than 0");
        }
        if !(0.0..=2.0).contains(&generation.temperature) {
            anyhow::bail!(
                "generation.temperature must be between 0 and 2, got {}",
                generation.temperature
            );
        }
        if generation.backend == Backend::Command
            && generation.command.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            anyhow::bail!("generation.command is required when backend is 'command'");
        }

        Ok(())
    }

    /// Replace the template of a step before execution (1-based index)
    pub fn set_template(&mut self, index: usize, template: String) -> Result<()> {
        let total = self.steps.len();
        let step = index
            .checked_sub(1)
            .and_then(|i| self.steps.get_mut(i))
            .ok_or_else(|| anyhow::anyhow!("Step {} does not exist (chain has {} steps)", index, total))?;
        step.template = template;
        Ok(())
    }

    /// Ordered step definitions for the executor
    pub fn step_definitions(&self) -> Vec<StepDefinition> {
        self.steps
            .iter()
            .map(|s| StepDefinition::new(s.name.clone(), s.template.clone()))
            .collect()
    }
}
