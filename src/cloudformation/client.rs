//! `CloudFormation` client wrapper.
//!
//! Implements [`StackOperations`] over the AWS SDK, mapping SDK errors
//! into the crate error types and hiding SDK types from the rest of the
//! crate. Waiting is delegated to the SDK's built-in waiters.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::primitives::DateTimeFormat;
use aws_sdk_cloudformation::types::{Capability, ChangeSetType, Parameter};
use tracing::{debug, info};

use crate::error::{CfnError, Result};

use super::api::StackOperations;
use super::types::{
    ChangeSetDescription, ChangeSetReadiness, ResourceChangeSummary, StackRequest, StackSummary,
    TemplateSummary,
};

/// Maximum time to wait for stack create or update completion.
const STACK_WAIT: Duration = Duration::from_secs(60 * 60);

/// Maximum time to wait for a change set to become reviewable.
const CHANGE_SET_WAIT: Duration = Duration::from_secs(10 * 60);

/// `StackOperations` implementation backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct CfnClient {
    client: Client,
}

impl CfnClient {
    /// Creates a client from shared AWS configuration.
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Creates a wrapper around an existing SDK client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Converts resolved parameters into SDK parameter values.
fn to_sdk_parameters(request: &StackRequest) -> Vec<Parameter> {
    request
        .parameters
        .iter()
        .map(|entry| {
            Parameter::builder()
                .parameter_key(&entry.key)
                .parameter_value(&entry.value)
                .build()
        })
        .collect()
}

/// Converts capability strings into SDK capabilities, or `None` when
/// there is nothing to acknowledge.
fn to_sdk_capabilities(request: &StackRequest) -> Option<Vec<Capability>> {
    if request.capabilities.is_empty() {
        None
    } else {
        Some(
            request
                .capabilities
                .iter()
                .map(|c| Capability::from(c.as_str()))
                .collect(),
        )
    }
}

/// Formats an SDK timestamp for display.
fn format_time(time: Option<&aws_sdk_cloudformation::primitives::DateTime>) -> Option<String> {
    time.and_then(|dt| dt.fmt(DateTimeFormat::DateTime).ok())
}

#[async_trait]
impl StackOperations for CfnClient {
    async fn validate_template(&self, template_body: &str) -> Result<TemplateSummary> {
        debug!("Validating template ({} bytes)", template_body.len());

        let output = self
            .client
            .validate_template()
            .template_body(template_body)
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::validation(format!("{service_err}"))
            })?;

        let parameter_keys = output
            .parameters()
            .iter()
            .filter_map(|p| p.parameter_key().map(ToString::to_string))
            .collect::<Vec<_>>();

        let capabilities = output
            .capabilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect::<Vec<_>>();

        debug!(
            "Template declares {} parameter(s), {} capability requirement(s)",
            parameter_keys.len(),
            capabilities.len()
        );

        Ok(TemplateSummary {
            parameter_keys,
            capabilities,
        })
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>> {
        debug!("Describing stack: {stack_name}");

        let result = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.stacks().first().map(|stack| StackSummary {
                name: stack.stack_name().unwrap_or(stack_name).to_string(),
                status: stack
                    .stack_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
                status_reason: stack.stack_status_reason().map(ToString::to_string),
                last_changed: format_time(stack.last_updated_time().or(stack.creation_time())),
            })),
            Err(sdk_err) => {
                let service_err = sdk_err.into_service_error();
                // A missing stack surfaces as a validation error whose
                // message names the stack, not as a typed variant.
                if service_err
                    .message()
                    .unwrap_or_default()
                    .contains("does not exist")
                {
                    debug!("Stack not found: {stack_name}");
                    Ok(None)
                } else {
                    Err(CfnError::request("DescribeStacks", format!("{service_err}")).into())
                }
            }
        }
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<String> {
        info!("Creating stack: {}", request.stack_name);

        let output = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(to_sdk_parameters(request)))
            .set_capabilities(to_sdk_capabilities(request))
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::request("CreateStack", format!("{service_err}"))
            })?;

        Ok(output
            .stack_id()
            .unwrap_or(request.stack_name.as_str())
            .to_string())
    }

    async fn wait_for_create(&self, stack_name: &str) -> Result<()> {
        debug!("Waiting for stack create to complete: {stack_name}");

        self.client
            .wait_until_stack_create_complete()
            .stack_name(stack_name)
            .wait(STACK_WAIT)
            .await
            .map_err(|e| CfnError::wait("stack create", stack_name, format!("{e}")))?;

        Ok(())
    }

    async fn create_change_set(
        &self,
        request: &StackRequest,
        change_set_name: &str,
    ) -> Result<String> {
        info!(
            "Creating change set {change_set_name} for stack {}",
            request.stack_name
        );

        let output = self
            .client
            .create_change_set()
            .stack_name(&request.stack_name)
            .change_set_name(change_set_name)
            .change_set_type(ChangeSetType::Update)
            .template_body(&request.template_body)
            .set_parameters(Some(to_sdk_parameters(request)))
            .set_capabilities(to_sdk_capabilities(request))
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::request("CreateChangeSet", format!("{service_err}"))
            })?;

        Ok(output.id().unwrap_or(change_set_name).to_string())
    }

    async fn wait_for_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetReadiness> {
        debug!("Waiting for change set to become reviewable: {change_set_name}");

        let wait_result = self
            .client
            .wait_until_change_set_create_complete()
            .stack_name(stack_name)
            .change_set_name(change_set_name)
            .wait(CHANGE_SET_WAIT)
            .await;

        match wait_result {
            Ok(_) => Ok(ChangeSetReadiness::Ready),
            Err(waiter_err) => {
                // Failed creation still describes; the status reason says
                // whether this is the provider's no-op signal.
                debug!("Change set waiter stopped early: {waiter_err}");
                let description = self
                    .describe_change_set(stack_name, change_set_name)
                    .await?;
                let reason = description
                    .status_reason
                    .unwrap_or_else(|| format!("{waiter_err}"));
                Ok(ChangeSetReadiness::classify_failure(&reason))
            }
        }
    }

    async fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetDescription> {
        debug!("Describing change set: {change_set_name}");

        let output = self
            .client
            .describe_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_name)
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::request("DescribeChangeSet", format!("{service_err}"))
            })?;

        let changes = output
            .changes()
            .iter()
            .filter_map(aws_sdk_cloudformation::types::Change::resource_change)
            .map(|rc| ResourceChangeSummary {
                action: rc
                    .action()
                    .map(|a| a.as_str().to_string())
                    .unwrap_or_default(),
                logical_id: rc.logical_resource_id().unwrap_or_default().to_string(),
                resource_type: rc.resource_type().unwrap_or_default().to_string(),
                replacement: rc
                    .replacement()
                    .map_or_else(|| "N/A".to_string(), |r| r.as_str().to_string()),
            })
            .collect::<Vec<_>>();

        Ok(ChangeSetDescription {
            change_set_name: output
                .change_set_name()
                .unwrap_or(change_set_name)
                .to_string(),
            stack_name: output.stack_name().unwrap_or(stack_name).to_string(),
            status: output
                .status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status_reason: output.status_reason().map(ToString::to_string),
            execution_status: output
                .execution_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            created_at: format_time(output.creation_time()).unwrap_or_default(),
            changes,
        })
    }

    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        info!("Executing change set {change_set_name} on stack {stack_name}");

        self.client
            .execute_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_name)
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::request("ExecuteChangeSet", format!("{service_err}"))
            })?;

        Ok(())
    }

    async fn wait_for_update(&self, stack_name: &str) -> Result<()> {
        debug!("Waiting for stack update to complete: {stack_name}");

        self.client
            .wait_until_stack_update_complete()
            .stack_name(stack_name)
            .wait(STACK_WAIT)
            .await
            .map_err(|e| CfnError::wait("stack update", stack_name, format!("{e}")))?;

        Ok(())
    }

    async fn delete_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        info!("Deleting change set {change_set_name} from stack {stack_name}");

        self.client
            .delete_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_name)
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                CfnError::request("DeleteChangeSet", format!("{service_err}"))
            })?;

        Ok(())
    }
}
