//! CLI module for the Stackforge deployment tool.
//!
//! This module provides the command-line interface for deploying
//! `CloudFormation` stacks.

mod commands;
mod output;

pub use commands::{Cli, Commands, PromptStyle};
pub use output::Reporter;
