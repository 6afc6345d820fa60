//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{InitCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Run a chain of LLM prompts, feeding each output into the next step
#[derive(Debug, Parser, Clone)]
#[command(name = "prompt-chain")]
#[command(version)]
#[command(about = "Run a chain of LLM prompts, feeding each output into the next step", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a chain
    Run(RunCommand),

    /// Validate a chain configuration
    Validate(ValidateCommand),

    /// Write the built-in chain to a file for editing
    Init(InitCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Default log filter when `RUST_LOG` is unset
    ///
    /// Progress is drawn on stderr next to the logs, so routine `info`
    /// lines are only shown with `--verbose`.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
