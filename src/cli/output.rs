//! Output formatting for CLI commands.
//!
//! Progress and outcome sentences go to stdout; diagnostic detail stays
//! on the tracing stream. The reporter carries the template and config
//! locators so the sentences can name what is being deployed.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::cloudformation::{DeployOutcome, DeployProgress, StackSummary};
use crate::config::Source;
use crate::params::ResolvedParameters;

/// Prints progress sentences and renders command output.
#[derive(Debug)]
pub struct Reporter {
    /// Template locator, as given on the command line.
    template: String,
    /// Config locators, comma-joined.
    configs: String,
}

/// Resolved parameter row for table display.
#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Reporter {
    /// Creates a reporter naming the given sources.
    #[must_use]
    pub fn new(template: &Source, configs: &[Source]) -> Self {
        Self {
            template: template.to_string(),
            configs: configs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Renders the terminal outcome of a deployment.
    #[must_use]
    pub fn render_outcome(&self, outcome: &DeployOutcome) -> String {
        match outcome {
            DeployOutcome::Created { stack_name } => {
                format!("{} Stack created: {stack_name}", "✓".green())
            }
            DeployOutcome::Updated { stack_name, .. } => {
                format!("{} Stack updated: {stack_name}", "✓".green())
            }
            DeployOutcome::NoChanges { stack_name } => format!(
                "No updates to be performed on stack {stack_name} from template {} and config {}",
                self.template, self.configs
            ),
            DeployOutcome::Discarded {
                change_set_name, ..
            } => {
                format!("Deleted change set {change_set_name}. No changes were applied.")
            }
            DeployOutcome::Deferred {
                change_set_name, ..
            } => {
                format!("Skipping change set execution: {change_set_name} (left in place)")
            }
            DeployOutcome::Aborted {
                stack_name, reason, ..
            } => format!(
                "{} No updates performed on stack {stack_name}: {reason}",
                "⚠".yellow()
            ),
        }
    }

    /// Renders the validate output: stack name, capabilities, and the
    /// resolved parameter table.
    #[must_use]
    pub fn render_parameters(&self, stack_name: &str, resolved: &ResolvedParameters) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "\nTemplate {} is valid.", self.template);
        let _ = writeln!(output, "   Stack name: {stack_name}");
        let _ = writeln!(
            output,
            "   Capabilities: {}",
            if resolved.capabilities.is_empty() {
                "(none)".to_string()
            } else {
                resolved.capabilities.join(", ")
            }
        );

        if resolved.parameters.is_empty() {
            output.push_str("\n   No parameters resolved from config.\n");
            return output;
        }

        let rows: Vec<ParameterRow> = resolved
            .parameters
            .iter()
            .map(|entry| ParameterRow {
                key: entry.key.clone(),
                value: entry.value.clone(),
            })
            .collect();

        output.push('\n');
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        output
    }

    /// Renders the status output for a stack lookup.
    #[must_use]
    pub fn render_stack_status(stack_name: &str, summary: Option<&StackSummary>) -> String {
        summary.map_or_else(
            || format!("Stack {stack_name} does not exist."),
            |stack| {
                let mut output = format!(
                    "Stack {}: {}",
                    stack.name,
                    Self::format_stack_status(&stack.status)
                );
                if let Some(changed) = &stack.last_changed {
                    let _ = write!(output, " (last change: {changed})");
                }
                if let Some(reason) = &stack.status_reason {
                    let _ = write!(output, "\n   Reason: {reason}");
                }
                output
            },
        )
    }

    /// Formats a stack status with color.
    fn format_stack_status(status: &str) -> String {
        if status.ends_with("COMPLETE") && !status.contains("ROLLBACK") {
            status.green().to_string()
        } else if status.ends_with("FAILED") || status.contains("ROLLBACK") {
            status.red().to_string()
        } else {
            status.yellow().to_string()
        }
    }
}

impl DeployProgress for Reporter {
    fn stack_creating(&self, stack_name: &str) {
        println!(
            "Creating stack {stack_name} from template {} and config {}",
            self.template, self.configs
        );
    }

    fn change_set_creating(&self, stack_name: &str, change_set_name: &str) {
        println!("Attempting to create change set {change_set_name} for stack {stack_name}");
    }

    fn stack_updating(&self, stack_name: &str, change_set_name: &str) {
        println!("Updating stack {stack_name} with change set {change_set_name}");
    }
}
