//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};

use crate::cloudformation::DEFAULT_ENVIRONMENT;
use crate::config::Source;

/// Stackforge - `CloudFormation` stack deployment helper.
#[derive(Parser, Debug)]
#[command(name = "stackforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// AWS region override.
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update a stack from a template and config sources.
    Deploy {
        /// Config source locators, merged in order (later overwrites earlier).
        #[arg(
            short = 'c',
            long = "config",
            required = true,
            num_args = 1..,
            value_name = "LOCATOR"
        )]
        configs: Vec<Source>,

        /// Template locator (local path or s3://bucket/key).
        #[arg(short, long, value_name = "LOCATOR")]
        template: Source,

        /// Environment suffix for the stack name.
        #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
        environment: String,

        /// Execute updates without interactive review.
        #[arg(short = 'y', long)]
        auto_approve: bool,

        /// Treat the template as a SAM template.
        #[arg(long)]
        sam: bool,

        /// Prompt style for change set review.
        #[arg(long, value_enum, default_value_t = PromptStyle::Menu)]
        prompt_style: PromptStyle,
    },

    /// Validate the template and show resolved parameters without deploying.
    Validate {
        /// Config source locators, merged in order.
        #[arg(
            short = 'c',
            long = "config",
            required = true,
            num_args = 1..,
            value_name = "LOCATOR"
        )]
        configs: Vec<Source>,

        /// Template locator (local path or s3://bucket/key).
        #[arg(short, long, value_name = "LOCATOR")]
        template: Source,

        /// Environment suffix for the stack name.
        #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
        environment: String,

        /// Treat the template as a SAM template.
        #[arg(long)]
        sam: bool,
    },

    /// Show the current status of the stack a template deploys to.
    Status {
        /// Template locator (local path or s3://bucket/key).
        #[arg(short, long, value_name = "LOCATOR")]
        template: Source,

        /// Environment suffix for the stack name.
        #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
        environment: String,
    },
}

/// Interactive prompt styles for change set review.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum PromptStyle {
    /// Change table plus a numbered menu.
    #[default]
    Menu,
    /// JSON dump plus raw tokens (1 / -1 / 0).
    Token,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
