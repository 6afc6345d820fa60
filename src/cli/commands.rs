//! CLI command definitions

use clap::Args;
use std::path::PathBuf;

/// Run a chain
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to chain YAML file (defaults to the built-in three-step chain)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Initial input text
    #[arg(short, long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Read the initial input from a file
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Template overrides applied before the run (index=template, 1-based)
    #[arg(short, long, value_parser = parse_index_template)]
    pub template: Vec<(usize, String)>,

    /// Override the model from the chain file
    #[arg(long)]
    pub model: Option<String>,

    /// Print the finished run as JSON instead of progress output
    #[arg(long)]
    pub json: bool,
}

/// Validate a chain configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to chain YAML file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Write the built-in chain to a YAML file
#[derive(Debug, Args, Clone)]
pub struct InitCommand {
    /// Where to write the chain file
    #[arg(short, long, default_value = "chain.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Parse index=template pairs
pub fn parse_index_template(s: &str) -> Result<(usize, String), String> {
    let (index, template) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid index=template pair: {}", s))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("Invalid step index: {}", index))?;
    if index == 0 {
        return Err("Step indices start at 1".to_string());
    }
    Ok((index, template.to_string()))
}
