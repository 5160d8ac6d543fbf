//! Provider operations trait.
//!
//! This module defines the interface the orchestrator depends on, so the
//! deployment flow can be exercised against an in-memory fake in tests.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{
    ChangeSetDescription, ChangeSetReadiness, StackRequest, StackSummary, TemplateSummary,
};

/// Trait over the `CloudFormation` operations the deployment flow uses.
#[async_trait]
pub trait StackOperations: Send + Sync {
    /// Validates a template body with the provider.
    ///
    /// Returns declared parameter names (in declaration order) and any
    /// required capabilities.
    async fn validate_template(&self, template_body: &str) -> Result<TemplateSummary>;

    /// Looks up an existing stack.
    ///
    /// Returns `None` if the stack does not exist.
    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>>;

    /// Creates a new stack.
    ///
    /// Returns the provider-issued stack id.
    async fn create_stack(&self, request: &StackRequest) -> Result<String>;

    /// Blocks until stack creation reaches a terminal state.
    async fn wait_for_create(&self, stack_name: &str) -> Result<()>;

    /// Creates a change set against an existing stack.
    ///
    /// Returns the provider-issued change set id.
    async fn create_change_set(&self, request: &StackRequest, change_set_name: &str)
        -> Result<String>;

    /// Blocks until the change set is reviewable or its creation fails,
    /// classifying failures as no-op or real.
    async fn wait_for_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetReadiness>;

    /// Fetches the full change set description for review.
    async fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetDescription>;

    /// Executes a reviewed change set.
    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()>;

    /// Blocks until a stack update reaches a terminal state.
    async fn wait_for_update(&self, stack_name: &str) -> Result<()>;

    /// Deletes a change set without executing it.
    async fn delete_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()>;
}

#[async_trait]
impl StackOperations for Box<dyn StackOperations> {
    async fn validate_template(&self, template_body: &str) -> Result<TemplateSummary> {
        (**self).validate_template(template_body).await
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>> {
        (**self).describe_stack(stack_name).await
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<String> {
        (**self).create_stack(request).await
    }

    async fn wait_for_create(&self, stack_name: &str) -> Result<()> {
        (**self).wait_for_create(stack_name).await
    }

    async fn create_change_set(
        &self,
        request: &StackRequest,
        change_set_name: &str,
    ) -> Result<String> {
        (**self).create_change_set(request, change_set_name).await
    }

    async fn wait_for_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetReadiness> {
        (**self).wait_for_change_set(stack_name, change_set_name).await
    }

    async fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> Result<ChangeSetDescription> {
        (**self).describe_change_set(stack_name, change_set_name).await
    }

    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        (**self).execute_change_set(stack_name, change_set_name).await
    }

    async fn wait_for_update(&self, stack_name: &str) -> Result<()> {
        (**self).wait_for_update(stack_name).await
    }

    async fn delete_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        (**self).delete_change_set(stack_name, change_set_name).await
    }
}
