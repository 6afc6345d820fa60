use anyhow::{Context, Result};
use prompt_chain::cli::commands::{InitCommand, RunCommand, ValidateCommand};
use prompt_chain::cli::output::*;
use prompt_chain::cli::{Cli, Command};
use prompt_chain::core::config::ChainConfig;
use prompt_chain::core::RunStatus;
use prompt_chain::execution::ChainExecutor;
use prompt_chain::generation::build_generator;
use std::io::{IsTerminal, Read};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_chain(cmd).await?,
        Command::Validate(cmd) => validate_chain(cmd)?,
        Command::Init(cmd) => init_chain(cmd)?,
    }

    Ok(())
}

async fn run_chain(cmd: &RunCommand) -> Result<()> {
    let mut config = match &cmd.file {
        Some(path) => ChainConfig::from_file(path)
            .with_context(|| format!("Failed to load chain config {}", path.display()))?,
        None => ChainConfig::default_chain(),
    };

    for (index, template) in &cmd.template {
        config.set_template(*index, template.clone())?;
    }
    if let Some(model) = &cmd.model {
        config.generation = config.generation.with_model(model.clone());
    }
    config.validate()?;

    let initial_input = read_initial_input(cmd)?;
    if initial_input.trim().is_empty() {
        anyhow::bail!("Initial input is empty; pass --input, --input-file or pipe text on stdin");
    }

    let generator = build_generator(&config.generation)?;
    let mut executor = ChainExecutor::new(generator);

    let renderer = if cmd.json {
        None
    } else {
        println!("{} Loaded chain: {}", INFO, style(&config.name).bold());
        let mut rx = executor.subscribe();
        Some(tokio::spawn(async move {
            let mut renderer = ProgressRenderer::new(20);
            while let Some(event) = rx.recv().await {
                renderer.render(&event);
            }
        }))
    };

    let result = executor.execute(&initial_input, &config.step_definitions()).await;

    // Closes the event channel so the renderer drains and exits
    drop(executor);
    if let Some(handle) = renderer {
        handle.await.context("Progress renderer crashed")?;
    }

    let run = result?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        println!("{}", format_run_summary(&run));
        if let Some(output) = run.final_output() {
            println!("\n{}\n{}", style("Final output").bold(), output);
        }
    }

    if run.status == RunStatus::Failed {
        if let Some(step) = run.failed_step() {
            error!("Step {} ({}) failed: {}", step.id, step.name, step.output);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn read_initial_input(cmd: &RunCommand) -> Result<String> {
    if let Some(input) = &cmd.input {
        return Ok(input.clone());
    }

    if let Some(path) = &cmd.input_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No input given; pass --input, --input-file or pipe text on stdin");
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    Ok(buffer)
}

fn validate_chain(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating chain...", INFO);

    match ChainConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Chain configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());
            println!(
                "  Model: {} (max_tokens {}, temperature {})",
                style(&config.generation.model).cyan(),
                config.generation.max_tokens,
                config.generation.temperature
            );

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn init_chain(cmd: &InitCommand) -> Result<()> {
    if cmd.output.exists() && !cmd.force {
        anyhow::bail!(
            "{} already exists; use --force to overwrite",
            cmd.output.display()
        );
    }

    let yaml = ChainConfig::default_chain().to_yaml()?;
    std::fs::write(&cmd.output, yaml)
        .with_context(|| format!("Failed to write {}", cmd.output.display()))?;

    println!(
        "{} Wrote default chain to {}",
        CHECK,
        style(cmd.output.display()).bold()
    );
    Ok(())
}
