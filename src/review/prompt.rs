//! Interactive prompt reviewers.
//!
//! Both reviewers print the change set to stdout and ask on stderr, so
//! redirected output stays clean. The read loops are factored over
//! `BufRead`/`Write` and re-prompt until a valid answer arrives.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use colored::Colorize;
use tabled::{Table, Tabled};

use crate::cloudformation::ChangeSetDescription;
use crate::error::{Result, StackforgeError};

use super::{ChangeSetReviewer, ReviewDecision};

/// Raw token prompt: the full change set as JSON, answered with
/// `1` / `-1` / `0`.
#[derive(Debug, Default)]
pub struct TokenReviewer;

/// Menu prompt: resource changes as a table, answered with a numbered
/// choice.
#[derive(Debug, Default)]
pub struct MenuReviewer;

impl TokenReviewer {
    /// Creates a token prompt reviewer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MenuReviewer {
    /// Creates a menu prompt reviewer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChangeSetReviewer for TokenReviewer {
    async fn review(&self, change_set: &ChangeSetDescription) -> Result<ReviewDecision> {
        let dump = serde_json::to_string_pretty(change_set)
            .map_err(|e| StackforgeError::internal(format!("{e}")))?;
        println!("{dump}");

        let stdin = std::io::stdin();
        let decision = read_token_decision(stdin.lock(), std::io::stderr())?;
        Ok(decision)
    }
}

#[async_trait]
impl ChangeSetReviewer for MenuReviewer {
    async fn review(&self, change_set: &ChangeSetDescription) -> Result<ReviewDecision> {
        println!("{}", render_change_set(change_set));

        let stdin = std::io::stdin();
        let decision = read_menu_decision(stdin.lock(), std::io::stderr())?;
        Ok(decision)
    }
}

/// Change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Replacement")]
    replacement: String,
}

/// Renders the change set header and change table.
fn render_change_set(change_set: &ChangeSetDescription) -> String {
    use std::fmt::Write as _;

    let mut output = String::new();

    let _ = writeln!(
        output,
        "\nChange set {} for stack {}",
        change_set.change_set_name, change_set.stack_name
    );
    let _ = writeln!(
        output,
        "   Status: {}   Execution: {}   Created: {}",
        format_status(&change_set.status),
        change_set.execution_status,
        change_set.created_at
    );

    if change_set.changes.is_empty() {
        output.push_str("\n   No resource changes reported.\n");
        return output;
    }

    let rows: Vec<ChangeRow> = change_set
        .changes
        .iter()
        .map(|change| ChangeRow {
            action: format_action(&change.action),
            logical_id: change.logical_id.clone(),
            resource_type: change.resource_type.clone(),
            replacement: change.replacement.clone(),
        })
        .collect();

    output.push('\n');
    output.push_str(&Table::new(rows).to_string());
    output.push('\n');

    output
}

/// Formats a change action with color.
fn format_action(action: &str) -> String {
    match action {
        "Add" => action.green().to_string(),
        "Modify" => action.yellow().to_string(),
        "Remove" => action.red().to_string(),
        _ => action.to_string(),
    }
}

/// Formats a change set status with color.
fn format_status(status: &str) -> String {
    if status.ends_with("COMPLETE") {
        status.green().to_string()
    } else if status.ends_with("FAILED") {
        status.red().to_string()
    } else {
        status.yellow().to_string()
    }
}

/// Reads a raw-token decision, re-prompting until one of `1`, `-1`, `0`
/// is entered.
fn read_token_decision(mut input: impl BufRead, mut prompt: impl Write) -> Result<ReviewDecision> {
    loop {
        write!(
            prompt,
            "Select 1 to execute change set, 0 to skip/retain change set, -1 to delete change set: "
        )?;
        prompt.flush()?;

        let Some(line) = read_answer(&mut input)? else {
            return Err(closed_input());
        };

        match line.trim() {
            "1" => return Ok(ReviewDecision::Execute),
            "-1" => return Ok(ReviewDecision::Discard),
            "0" => return Ok(ReviewDecision::Defer),
            other => writeln!(prompt, "Unrecognized selection: {other}")?,
        }
    }
}

/// Reads a menu decision, re-prompting until a listed choice is entered.
fn read_menu_decision(mut input: impl BufRead, mut prompt: impl Write) -> Result<ReviewDecision> {
    writeln!(prompt, "  1) Execute the change set")?;
    writeln!(prompt, "  2) Discard the change set (delete it)")?;
    writeln!(prompt, "  3) Defer (keep the change set, execute nothing)")?;

    loop {
        write!(prompt, "Choice [1-3]: ")?;
        prompt.flush()?;

        let Some(line) = read_answer(&mut input)? else {
            return Err(closed_input());
        };

        match line.trim() {
            "1" => return Ok(ReviewDecision::Execute),
            "2" => return Ok(ReviewDecision::Discard),
            "3" => return Ok(ReviewDecision::Defer),
            other => writeln!(prompt, "Unrecognized selection: {other}")?,
        }
    }
}

/// Reads one answer line, or `None` on end of input.
fn read_answer(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

fn closed_input() -> StackforgeError {
    StackforgeError::internal("input closed before a review decision was made")
}
