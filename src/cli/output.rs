//! CLI output formatting

use crate::{
    core::{ChainRun, ChainSnapshot, RunStatus, Step, StepStatus},
    execution::ChainEvent,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static CLOCK: Emoji<'_, '_> = Emoji("🕒 ", "- ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner for a step waiting on the generation service
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.magenta} [{elapsed}] {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a step status for display
pub fn format_step_status(status: StepStatus) -> String {
    match status {
        StepStatus::Pending => style("PENDING").dim().to_string(),
        StepStatus::Processing => style("PROCESSING").magenta().to_string(),
        StepStatus::Completed => style("COMPLETED").green().to_string(),
        StepStatus::Error => style("ERROR").red().to_string(),
    }
}

/// Format a run status for display
pub fn format_run_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Closing line for a run: `Run 1a2b3c4d COMPLETED (3/3 steps)`
pub fn format_run_footer(snapshot: &ChainSnapshot) -> String {
    let completed = snapshot
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Completed)
        .count();
    format!(
        "Run {} {} ({}/{} steps)",
        style(&snapshot.run_id.to_string()[..8]).dim(),
        format_run_status(snapshot.status),
        completed,
        snapshot.steps.len()
    )
}

/// One-line header for a step: `[2/3] Step 2: Analyze  COMPLETED`
pub fn format_step_line(step: &Step, total: usize) -> String {
    let icon = match step.status {
        StepStatus::Pending => CLOCK,
        StepStatus::Processing => ROCKET,
        StepStatus::Completed => CHECK,
        StepStatus::Error => CROSS,
    };
    format!(
        "{}[{}/{}] {}  {}",
        icon,
        style(step.id).cyan(),
        style(total).dim(),
        style(&step.name).bold(),
        format_step_status(step.status)
    )
}

/// Format step output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

/// A horizontal rule spanning the terminal width
pub fn separator() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(80);
    "─".repeat(width)
}

/// Summary line for a finished run
pub fn format_run_summary(run: &ChainRun) -> String {
    let total = run.steps.len();
    let completed = run.count(StepStatus::Completed);
    match run.status {
        RunStatus::Completed => format!(
            "{} Chain {} ({}/{} steps)",
            CHECK,
            style("completed").green(),
            completed,
            total
        ),
        _ => {
            let failed = run
                .failed_step()
                .map(|s| format!(" at step {} ({})", s.id, s.name))
                .unwrap_or_default();
            format!(
                "{} Chain {}{} ({}/{} steps completed, {} not attempted)",
                CROSS,
                style("failed").red(),
                failed,
                completed,
                total,
                run.count(StepStatus::Pending)
            )
        }
    }
}

/// Renders chain events to the terminal as they arrive
///
/// Shows a spinner while a step is processing and prints each step's
/// output (truncated to `max_lines`) once it reaches a terminal status.
pub struct ProgressRenderer {
    max_lines: usize,
    spinner: Option<ProgressBar>,
}

impl ProgressRenderer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            spinner: None,
        }
    }

    /// Render a single event
    pub fn render(&mut self, event: &ChainEvent) {
        match event {
            ChainEvent::RunStarted(snapshot) => {
                println!(
                    "{} Running {} steps ({})",
                    ROCKET,
                    style(snapshot.steps.len()).cyan(),
                    style(&snapshot.run_id.to_string()[..8]).dim()
                );
                for step in &snapshot.steps {
                    println!("  {}", format_step_line(step, snapshot.steps.len()));
                }
            }
            ChainEvent::StepUpdated { step_id, snapshot } => {
                let Some(step) = snapshot.step(*step_id) else {
                    return;
                };
                let total = snapshot.steps.len();
                match step.status {
                    StepStatus::Processing => {
                        self.finish_spinner();
                        println!("\n{}", separator());
                        self.spinner = Some(create_spinner(format_step_line(step, total)));
                    }
                    StepStatus::Completed | StepStatus::Error => {
                        self.finish_spinner();
                        println!("{}", format_step_line(step, total));
                        let body = format_output(&step.output, self.max_lines);
                        if step.status == StepStatus::Error {
                            println!("{}", style(body).red());
                        } else {
                            println!("{}", body);
                        }
                    }
                    StepStatus::Pending => {}
                }
            }
            ChainEvent::RunFinished(snapshot) => {
                self.finish_spinner();
                println!("{}", separator());
                println!("{}", format_run_footer(snapshot));
            }
        }
    }

    fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
