//! `CloudFormation` integration for Stackforge.
//!
//! Splits into the provider operations trait, the SDK-backed client,
//! the deployment orchestrator, and the value types shared between
//! them.

mod api;
mod client;
mod deployer;
mod types;

pub use api::StackOperations;
pub use client::CfnClient;
pub use deployer::{DEFAULT_ENVIRONMENT, DeployProgress, StackDeployer, derive_stack_name};
pub use types::{
    ChangeSetDescription, ChangeSetReadiness, DeployOutcome, ParameterEntry,
    ResourceChangeSummary, StackRequest, StackSummary, TemplateSummary,
};
