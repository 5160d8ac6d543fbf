//! Stackforge CLI entrypoint.
//!
//! This is the main entrypoint for the stackforge command-line tool.

use std::process::ExitCode;

use stackforge::cli::{Cli, Commands, PromptStyle, Reporter};
use stackforge::cloudformation::{
    CfnClient, StackDeployer, StackOperations, StackRequest, derive_stack_name,
};
use stackforge::config::{Source, load_config, load_template};
use stackforge::error::Result;
use stackforge::params::ParameterReconciler;
use stackforge::review::{ChangeSetReviewer, MenuReviewer, TokenReviewer};
use stackforge::storage::SourceReader;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Load a .env file when one is present
    if dotenvy::dotenv().is_ok() {
        debug!("Loaded environment from .env");
    }

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Diagnostics go to stderr; stdout carries the command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            configs,
            template,
            environment,
            auto_approve,
            sam,
            prompt_style,
        } => {
            cmd_deploy(
                cli.region.as_deref(),
                &configs,
                &template,
                &environment,
                auto_approve,
                sam,
                prompt_style,
            )
            .await
        }
        Commands::Validate {
            configs,
            template,
            environment,
            sam,
        } => cmd_validate(cli.region.as_deref(), &configs, &template, &environment, sam).await,
        Commands::Status {
            template,
            environment,
        } => cmd_status(cli.region.as_deref(), &template, &environment).await,
    }
}

/// Loads the shared AWS configuration, honoring an explicit region override.
async fn load_aws_config(region: Option<&str>) -> aws_config::SdkConfig {
    if let Some(region_str) = region {
        aws_config::from_env()
            .region(aws_config::Region::new(region_str.to_string()))
            .load()
            .await
    } else {
        aws_config::load_from_env().await
    }
}

/// Deploy a stack: create it, or update it through a reviewed change set.
async fn cmd_deploy(
    region: Option<&str>,
    configs: &[Source],
    template: &Source,
    environment: &str,
    auto_approve: bool,
    sam: bool,
    prompt_style: PromptStyle,
) -> Result<()> {
    let aws_config = load_aws_config(region).await;
    let reader = SourceReader::new(&aws_config);

    let config = load_config(&reader, configs).await;
    let template_body = load_template(&reader, template).await?;

    let client = CfnClient::new(&aws_config);
    let resolved = ParameterReconciler::new(&client)
        .resolve(&config, template_body, sam)
        .await?;

    let stack_name = derive_stack_name(template, environment);
    debug!("Resolved stack name: {stack_name}");

    let request = StackRequest {
        stack_name,
        template_body: resolved.template_body,
        parameters: resolved.parameters,
        capabilities: resolved.capabilities,
    };

    let reporter = Reporter::new(template, configs);

    // --auto-approve drops the reviewer entirely; change sets then
    // execute without a describe round-trip.
    let reviewer: Option<Box<dyn ChangeSetReviewer>> = if auto_approve {
        None
    } else {
        match prompt_style {
            PromptStyle::Menu => Some(Box::new(MenuReviewer::new())),
            PromptStyle::Token => Some(Box::new(TokenReviewer::new())),
        }
    };

    let mut deployer = StackDeployer::new(&client);
    if let Some(reviewer) = reviewer.as_deref() {
        deployer = deployer.with_reviewer(reviewer);
    }

    let outcome = deployer.deploy(&request, &reporter).await?;
    println!("{}", reporter.render_outcome(&outcome));

    Ok(())
}

/// Validate the template and show the parameters a deploy would send.
async fn cmd_validate(
    region: Option<&str>,
    configs: &[Source],
    template: &Source,
    environment: &str,
    sam: bool,
) -> Result<()> {
    let aws_config = load_aws_config(region).await;
    let reader = SourceReader::new(&aws_config);

    let config = load_config(&reader, configs).await;
    let template_body = load_template(&reader, template).await?;

    let client = CfnClient::new(&aws_config);
    let resolved = ParameterReconciler::new(&client)
        .resolve(&config, template_body, sam)
        .await?;

    let stack_name = derive_stack_name(template, environment);
    let reporter = Reporter::new(template, configs);
    println!("{}", reporter.render_parameters(&stack_name, &resolved));

    Ok(())
}

/// Show the current status of the stack a template maps to.
async fn cmd_status(region: Option<&str>, template: &Source, environment: &str) -> Result<()> {
    let aws_config = load_aws_config(region).await;
    let client = CfnClient::new(&aws_config);

    let stack_name = derive_stack_name(template, environment);
    let summary = client.describe_stack(&stack_name).await?;
    println!("{}", Reporter::render_stack_status(&stack_name, summary.as_ref()));

    Ok(())
}
