//! Deployment orchestration.
//!
//! This module decides between creating a stack and updating it through
//! a change set, drives the provider waiters to completion, and returns
//! a typed outcome so the caller can report what actually happened.
//! Change sets are cleaned up per outcome: deleted on no-op, discard,
//! and failure; kept only when the reviewer defers.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Source;
use crate::error::{Result, StackforgeError};
use crate::review::{ChangeSetReviewer, ReviewDecision};

use super::api::StackOperations;
use super::types::{ChangeSetReadiness, DeployOutcome, StackRequest};

/// Prefix for generated change set names.
const CHANGE_SET_PREFIX: &str = "stackforge";

/// Environment sentinel meaning "no environment suffix".
pub const DEFAULT_ENVIRONMENT: &str = "none";

/// Hooks for announcing long-running phases before they start.
///
/// Outcome reporting happens from the returned [`DeployOutcome`]; these
/// callbacks exist because the create-vs-update decision is made here,
/// after the caller has handed over control.
pub trait DeployProgress {
    /// Stack creation is about to start.
    fn stack_creating(&self, stack_name: &str);
    /// A change set is about to be created.
    fn change_set_creating(&self, stack_name: &str, change_set_name: &str);
    /// An approved change set is about to execute.
    fn stack_updating(&self, stack_name: &str, change_set_name: &str);
}

/// Orchestrates one deployment attempt against the provider.
pub struct StackDeployer<'a> {
    /// Provider operations.
    ops: &'a dyn StackOperations,
    /// Reviewer for pending change sets; `None` means auto-approve.
    reviewer: Option<&'a dyn ChangeSetReviewer>,
}

impl<'a> StackDeployer<'a> {
    /// Creates a deployer that auto-approves updates.
    #[must_use]
    pub const fn new(ops: &'a dyn StackOperations) -> Self {
        Self {
            ops,
            reviewer: None,
        }
    }

    /// Gates updates behind the given reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer: &'a dyn ChangeSetReviewer) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Runs the create-or-update flow for one stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or the create path
    /// fails, if the review round-trip breaks, or if anything fails
    /// once change set execution has begun. Change set creation
    /// failures are not errors; they come back as
    /// [`DeployOutcome::NoChanges`] or [`DeployOutcome::Aborted`].
    pub async fn deploy(
        &self,
        request: &StackRequest,
        progress: &dyn DeployProgress,
    ) -> Result<DeployOutcome> {
        match self.ops.describe_stack(&request.stack_name).await? {
            None => {
                debug!("Stack {} not found, creating", request.stack_name);
                self.create(request, progress).await
            }
            Some(existing) => {
                debug!(
                    "Stack {} exists with status {}, updating",
                    existing.name, existing.status
                );
                self.update(request, progress).await
            }
        }
    }

    /// Create path: one request plus the create waiter.
    async fn create(
        &self,
        request: &StackRequest,
        progress: &dyn DeployProgress,
    ) -> Result<DeployOutcome> {
        progress.stack_creating(&request.stack_name);

        let stack_id = self.ops.create_stack(request).await?;
        debug!("Create accepted, stack id: {stack_id}");

        self.ops.wait_for_create(&request.stack_name).await?;
        info!("Stack created: {}", request.stack_name);

        Ok(DeployOutcome::Created {
            stack_name: request.stack_name.clone(),
        })
    }

    /// Update path: change set, readiness, review, then execute or
    /// clean up.
    ///
    /// Failures before the change set is reviewable resolve to
    /// [`DeployOutcome::Aborted`], never to an error.
    async fn update(
        &self,
        request: &StackRequest,
        progress: &dyn DeployProgress,
    ) -> Result<DeployOutcome> {
        let change_set_name = fresh_change_set_name();
        progress.change_set_creating(&request.stack_name, &change_set_name);

        let readiness = match self.prepare_change_set(request, &change_set_name).await {
            Ok(readiness) => readiness,
            Err(error) => {
                warn!("Change set {change_set_name} could not be prepared: {error}");
                self.delete_incomplete(&request.stack_name, &change_set_name)
                    .await;
                let reason = match error {
                    StackforgeError::Cfn(cfn) => cfn.to_string(),
                    other => other.to_string(),
                };
                return Ok(DeployOutcome::Aborted {
                    stack_name: request.stack_name.clone(),
                    change_set_name,
                    reason,
                });
            }
        };

        match readiness {
            ChangeSetReadiness::Ready => {
                self.review_and_execute(request, &change_set_name, progress)
                    .await
            }
            ChangeSetReadiness::NoChanges { reason } => {
                debug!("Change set {change_set_name} reported no changes: {reason}");
                self.ops
                    .delete_change_set(&request.stack_name, &change_set_name)
                    .await?;
                Ok(DeployOutcome::NoChanges {
                    stack_name: request.stack_name.clone(),
                })
            }
            ChangeSetReadiness::Failed { reason } => {
                warn!("Change set {change_set_name} failed: {reason}");
                self.ops
                    .delete_change_set(&request.stack_name, &change_set_name)
                    .await?;
                Ok(DeployOutcome::Aborted {
                    stack_name: request.stack_name.clone(),
                    change_set_name,
                    reason,
                })
            }
        }
    }

    /// Issues the change set request and waits for the readiness verdict.
    async fn prepare_change_set(
        &self,
        request: &StackRequest,
        change_set_name: &str,
    ) -> Result<ChangeSetReadiness> {
        self.ops
            .create_change_set(request, change_set_name)
            .await?;
        self.ops
            .wait_for_change_set(&request.stack_name, change_set_name)
            .await
    }

    /// Best-effort delete for a change set that never became reviewable.
    async fn delete_incomplete(&self, stack_name: &str, change_set_name: &str) {
        if let Err(error) = self
            .ops
            .delete_change_set(stack_name, change_set_name)
            .await
        {
            debug!("Could not delete change set {change_set_name}: {error}");
        }
    }

    /// Collects the decision for a reviewable change set and acts on it.
    async fn review_and_execute(
        &self,
        request: &StackRequest,
        change_set_name: &str,
        progress: &dyn DeployProgress,
    ) -> Result<DeployOutcome> {
        let decision = match self.reviewer {
            None => {
                debug!("Auto-approval configured, executing without review");
                ReviewDecision::Execute
            }
            Some(reviewer) => {
                let description = self
                    .ops
                    .describe_change_set(&request.stack_name, change_set_name)
                    .await?;
                reviewer.review(&description).await?
            }
        };

        match decision {
            ReviewDecision::Execute => {
                progress.stack_updating(&request.stack_name, change_set_name);

                self.ops
                    .execute_change_set(&request.stack_name, change_set_name)
                    .await?;
                self.ops.wait_for_update(&request.stack_name).await?;
                info!("Stack updated: {}", request.stack_name);

                Ok(DeployOutcome::Updated {
                    stack_name: request.stack_name.clone(),
                    change_set_name: change_set_name.to_string(),
                })
            }
            ReviewDecision::Discard => {
                self.ops
                    .delete_change_set(&request.stack_name, change_set_name)
                    .await?;
                info!("Change set {change_set_name} discarded");

                Ok(DeployOutcome::Discarded {
                    stack_name: request.stack_name.clone(),
                    change_set_name: change_set_name.to_string(),
                })
            }
            ReviewDecision::Defer => {
                info!("Change set {change_set_name} retained for later execution");

                Ok(DeployOutcome::Deferred {
                    stack_name: request.stack_name.clone(),
                    change_set_name: change_set_name.to_string(),
                })
            }
        }
    }
}

/// Generates a unique change set name.
fn fresh_change_set_name() -> String {
    format!("{CHANGE_SET_PREFIX}-{}", Uuid::new_v4())
}

/// Derives the stack name from the template locator and environment.
///
/// The final path segment keeps everything before the first `.` and is
/// upper-cased; an environment other than the `none` sentinel appends
/// `-ENVIRONMENT`.
#[must_use]
pub fn derive_stack_name(template: &Source, environment: &str) -> String {
    let segment = template.final_segment();
    let base = segment.split('.').next().unwrap_or(segment);

    let mut name = base.to_uppercase();
    if environment != DEFAULT_ENVIRONMENT {
        name.push('-');
        name.push_str(&environment.to_uppercase());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::types::{
        ChangeSetDescription, ParameterEntry, StackSummary, TemplateSummary,
    };
    use crate::error::{CfnError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct NoProgress;

    impl DeployProgress for NoProgress {
        fn stack_creating(&self, _stack_name: &str) {}
        fn change_set_creating(&self, _stack_name: &str, _change_set_name: &str) {}
        fn stack_updating(&self, _stack_name: &str, _change_set_name: &str) {}
    }

    #[derive(Default)]
    struct Calls {
        create_stack: usize,
        create_change_set: usize,
        describe_change_set: usize,
        execute_change_set: usize,
        delete_change_set: usize,
    }

    #[derive(Default)]
    struct Failures {
        create_change_set: Option<String>,
        wait_for_change_set: Option<String>,
        delete_change_set: Option<String>,
    }

    struct FakeStackOps {
        exists: bool,
        readiness: ChangeSetReadiness,
        failures: Failures,
        calls: Mutex<Calls>,
        requests: Mutex<Vec<StackRequest>>,
    }

    impl FakeStackOps {
        fn new(exists: bool, readiness: ChangeSetReadiness) -> Self {
            Self {
                exists,
                readiness,
                failures: Failures::default(),
                calls: Mutex::new(Calls::default()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn fail_create_change_set(mut self, message: &str) -> Self {
            self.failures.create_change_set = Some(message.to_string());
            self
        }

        fn fail_wait_for_change_set(mut self, message: &str) -> Self {
            self.failures.wait_for_change_set = Some(message.to_string());
            self
        }

        fn fail_delete_change_set(mut self, message: &str) -> Self {
            self.failures.delete_change_set = Some(message.to_string());
            self
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
            self.calls.lock().unwrap()
        }

        fn last_request(&self) -> Option<StackRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl StackOperations for FakeStackOps {
        async fn validate_template(&self, _template_body: &str) -> Result<TemplateSummary> {
            Ok(TemplateSummary::default())
        }

        async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>> {
            Ok(self.exists.then(|| StackSummary {
                name: stack_name.to_string(),
                status: "CREATE_COMPLETE".to_string(),
                status_reason: None,
                last_changed: None,
            }))
        }

        async fn create_stack(&self, request: &StackRequest) -> Result<String> {
            self.calls().create_stack += 1;
            self.requests.lock().unwrap().push(request.clone());
            Ok(format!("arn:aws:cloudformation:::{}", request.stack_name))
        }

        async fn wait_for_create(&self, _stack_name: &str) -> Result<()> {
            Ok(())
        }

        async fn create_change_set(
            &self,
            request: &StackRequest,
            change_set_name: &str,
        ) -> Result<String> {
            self.calls().create_change_set += 1;
            self.requests.lock().unwrap().push(request.clone());
            if let Some(message) = &self.failures.create_change_set {
                return Err(CfnError::request("CreateChangeSet", message.clone()).into());
            }
            Ok(change_set_name.to_string())
        }

        async fn wait_for_change_set(
            &self,
            _stack_name: &str,
            _change_set_name: &str,
        ) -> Result<ChangeSetReadiness> {
            if let Some(message) = &self.failures.wait_for_change_set {
                return Err(CfnError::request("DescribeChangeSet", message.clone()).into());
            }
            Ok(self.readiness.clone())
        }

        async fn describe_change_set(
            &self,
            stack_name: &str,
            change_set_name: &str,
        ) -> Result<ChangeSetDescription> {
            self.calls().describe_change_set += 1;
            Ok(ChangeSetDescription {
                change_set_name: change_set_name.to_string(),
                stack_name: stack_name.to_string(),
                status: "CREATE_COMPLETE".to_string(),
                status_reason: None,
                execution_status: "AVAILABLE".to_string(),
                created_at: String::new(),
                changes: vec![],
            })
        }

        async fn execute_change_set(
            &self,
            _stack_name: &str,
            _change_set_name: &str,
        ) -> Result<()> {
            self.calls().execute_change_set += 1;
            Ok(())
        }

        async fn wait_for_update(&self, _stack_name: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_change_set(
            &self,
            _stack_name: &str,
            _change_set_name: &str,
        ) -> Result<()> {
            self.calls().delete_change_set += 1;
            if let Some(message) = &self.failures.delete_change_set {
                return Err(CfnError::request("DeleteChangeSet", message.clone()).into());
            }
            Ok(())
        }
    }

    struct FixedReviewer {
        decision: ReviewDecision,
        invoked: Mutex<bool>,
    }

    impl FixedReviewer {
        fn new(decision: ReviewDecision) -> Self {
            Self {
                decision,
                invoked: Mutex::new(false),
            }
        }

        fn was_invoked(&self) -> bool {
            *self.invoked.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChangeSetReviewer for FixedReviewer {
        async fn review(&self, _change_set: &ChangeSetDescription) -> Result<ReviewDecision> {
            *self.invoked.lock().unwrap() = true;
            Ok(self.decision)
        }
    }

    fn request() -> StackRequest {
        request_with_parameter("InstanceType", "t3.micro")
    }

    fn request_with_parameter(key: &str, value: &str) -> StackRequest {
        StackRequest {
            stack_name: "MY-APP".to_string(),
            template_body: "Resources: {}".to_string(),
            parameters: vec![ParameterEntry::new(key, value)],
            capabilities: vec![],
        }
    }

    fn ready() -> ChangeSetReadiness {
        ChangeSetReadiness::Ready
    }

    #[tokio::test]
    async fn test_missing_stack_issues_one_create_and_no_change_set() {
        let ops = FakeStackOps::new(false, ready());
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::Created {
                stack_name: "MY-APP".to_string()
            }
        );
        let calls = ops.calls();
        assert_eq!(calls.create_stack, 1);
        assert_eq!(calls.create_change_set, 0);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_no_op_update_deletes_change_set_without_executing() {
        let ops = FakeStackOps::new(
            true,
            ChangeSetReadiness::NoChanges {
                reason: "The submitted information didn't contain changes.".to_string(),
            },
        );
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::NoChanges {
                stack_name: "MY-APP".to_string()
            }
        );
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 1);
        assert_eq!(calls.execute_change_set, 0);
        assert_eq!(calls.create_stack, 0);
    }

    #[tokio::test]
    async fn test_auto_approve_executes_without_consulting_reviewer() {
        let ops = FakeStackOps::new(true, ready());
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert!(matches!(outcome, DeployOutcome::Updated { .. }));
        let calls = ops.calls();
        assert_eq!(calls.execute_change_set, 1);
        assert_eq!(calls.describe_change_set, 0);
    }

    #[tokio::test]
    async fn test_reviewer_execute_runs_update() {
        let ops = FakeStackOps::new(true, ready());
        let reviewer = FixedReviewer::new(ReviewDecision::Execute);
        let deployer = StackDeployer::new(&ops).with_reviewer(&reviewer);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert!(matches!(outcome, DeployOutcome::Updated { .. }));
        assert!(reviewer.was_invoked());
        assert_eq!(ops.calls().execute_change_set, 1);
    }

    #[tokio::test]
    async fn test_reviewer_discard_deletes_change_set() {
        let ops = FakeStackOps::new(true, ready());
        let reviewer = FixedReviewer::new(ReviewDecision::Discard);
        let deployer = StackDeployer::new(&ops).with_reviewer(&reviewer);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert!(matches!(outcome, DeployOutcome::Discarded { .. }));
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 1);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_reviewer_defer_leaves_change_set_in_place() {
        let ops = FakeStackOps::new(true, ready());
        let reviewer = FixedReviewer::new(ReviewDecision::Defer);
        let deployer = StackDeployer::new(&ops).with_reviewer(&reviewer);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert!(matches!(outcome, DeployOutcome::Deferred { .. }));
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 0);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_failed_change_set_aborts_and_cleans_up() {
        let ops = FakeStackOps::new(
            true,
            ChangeSetReadiness::Failed {
                reason: "Parameter 'VpcId' must have a value".to_string(),
            },
        );
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        match outcome {
            DeployOutcome::Aborted { reason, .. } => {
                assert!(reason.contains("VpcId"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 1);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_rejected_change_set_request_aborts_and_cleans_up() {
        let ops = FakeStackOps::new(true, ready()).fail_create_change_set(
            "Stack [MY-APP] is in ROLLBACK_COMPLETE state and can not be updated.",
        );
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        match outcome {
            DeployOutcome::Aborted { reason, .. } => {
                assert!(reason.contains("ROLLBACK_COMPLETE"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 1);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_unresolvable_change_set_status_aborts_and_cleans_up() {
        let ops = FakeStackOps::new(true, ready()).fail_wait_for_change_set("Rate exceeded");
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        match outcome {
            DeployOutcome::Aborted { reason, .. } => {
                assert!(reason.contains("Rate exceeded"));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        let calls = ops.calls();
        assert_eq!(calls.delete_change_set, 1);
        assert_eq!(calls.execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_mask_aborted_outcome() {
        let ops = FakeStackOps::new(true, ready())
            .fail_create_change_set(
                "Stack [MY-APP] is in UPDATE_IN_PROGRESS state and can not be updated.",
            )
            .fail_delete_change_set("ChangeSet [stackforge-1] does not exist");
        let deployer = StackDeployer::new(&ops);

        let outcome = deployer.deploy(&request(), &NoProgress).await.unwrap();

        assert!(matches!(outcome, DeployOutcome::Aborted { .. }));
        assert_eq!(ops.calls().execute_change_set, 0);
    }

    #[tokio::test]
    async fn test_create_request_forwards_parameter_values_unmodified() {
        let ops = FakeStackOps::new(false, ready());
        let deployer = StackDeployer::new(&ops);
        let input = request_with_parameter("Endpoint", "https://api.example.com:8443/v1?x=1");

        deployer.deploy(&input, &NoProgress).await.unwrap();

        let forwarded = ops.last_request().unwrap();
        assert_eq!(forwarded.parameters, input.parameters);
        assert_eq!(forwarded.stack_name, input.stack_name);
    }

    #[tokio::test]
    async fn test_change_set_request_forwards_parameter_values_unmodified() {
        let ops = FakeStackOps::new(true, ready());
        let deployer = StackDeployer::new(&ops);
        let input = request_with_parameter("Endpoint", "https://api.example.com:8443/v1?x=1");

        deployer.deploy(&input, &NoProgress).await.unwrap();

        let forwarded = ops.last_request().unwrap();
        assert_eq!(forwarded.parameters, input.parameters);
    }

    #[test]
    fn test_change_set_names_are_prefixed_and_unique() {
        let first = fresh_change_set_name();
        let second = fresh_change_set_name();
        assert!(first.starts_with("stackforge-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_stack_name_from_template_path() {
        let template: Source = "templates/my-app.yaml".parse().unwrap();
        assert_eq!(derive_stack_name(&template, "none"), "MY-APP");
    }

    #[test]
    fn test_stack_name_with_environment_suffix() {
        let template: Source = "templates/my-app.yaml".parse().unwrap();
        assert_eq!(derive_stack_name(&template, "stage"), "MY-APP-STAGE");
    }

    #[test]
    fn test_stack_name_strips_everything_after_first_dot() {
        let template: Source = "web.template.json".parse().unwrap();
        assert_eq!(derive_stack_name(&template, "none"), "WEB");
    }

    #[test]
    fn test_stack_name_from_remote_locator() {
        let template: Source = "s3://bucket/nested/dir/api-gw.yaml".parse().unwrap();
        assert_eq!(derive_stack_name(&template, "prod"), "API-GW-PROD");
    }
}
