//! `CloudFormation` value types crossing the provider seam.
//!
//! These types carry everything the orchestrator and reviewers need
//! without exposing SDK types outside the client module.

use serde::Serialize;

/// A resolved template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterEntry {
    /// Declared parameter name.
    pub key: String,
    /// Resolved value from the config mapping.
    pub value: String,
}

impl ParameterEntry {
    /// Creates a parameter entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything needed to create a stack or a change set.
#[derive(Debug, Clone)]
pub struct StackRequest {
    /// Stack name.
    pub stack_name: String,
    /// Raw template body.
    pub template_body: String,
    /// Resolved parameters.
    pub parameters: Vec<ParameterEntry>,
    /// Capability acknowledgments to send.
    pub capabilities: Vec<String>,
}

/// What template validation reports back.
#[derive(Debug, Clone, Default)]
pub struct TemplateSummary {
    /// Parameter names the template declares, in declaration order.
    pub parameter_keys: Vec<String>,
    /// Capabilities the provider requires for this template.
    pub capabilities: Vec<String>,
}

/// Current state of an existing stack.
#[derive(Debug, Clone)]
pub struct StackSummary {
    /// Stack name.
    pub name: String,
    /// Provider stack status, e.g. `CREATE_COMPLETE`.
    pub status: String,
    /// Status reason, when the provider supplies one.
    pub status_reason: Option<String>,
    /// Last update or creation time, formatted.
    pub last_changed: Option<String>,
}

/// Outcome of waiting for a change set to become reviewable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSetReadiness {
    /// The change set is ready for review.
    Ready,
    /// The provider found nothing to change.
    NoChanges {
        /// Provider status reason.
        reason: String,
    },
    /// Creation failed for some other reason.
    Failed {
        /// Provider status reason.
        reason: String,
    },
}

impl ChangeSetReadiness {
    /// Classifies a failed change set's status reason.
    ///
    /// The provider reports a no-op update as a creation failure; the
    /// reason text is the only signal distinguishing it from real
    /// failures.
    #[must_use]
    pub fn classify_failure(reason: &str) -> Self {
        if reason.contains("didn't contain changes")
            || reason.contains("No updates are to be performed")
        {
            Self::NoChanges {
                reason: reason.to_string(),
            }
        } else {
            Self::Failed {
                reason: reason.to_string(),
            }
        }
    }
}

/// One resource-level change inside a change set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceChangeSummary {
    /// Change action, e.g. `Add`, `Modify`, `Remove`.
    pub action: String,
    /// Logical resource id within the template.
    pub logical_id: String,
    /// Resource type, e.g. `AWS::S3::Bucket`.
    pub resource_type: String,
    /// Whether the change replaces the resource.
    pub replacement: String,
}

/// Full description of a change set, as shown to reviewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeSetDescription {
    /// Change set name.
    pub change_set_name: String,
    /// Stack the change set targets.
    pub stack_name: String,
    /// Provider status, e.g. `CREATE_COMPLETE`.
    pub status: String,
    /// Status reason, when present.
    pub status_reason: Option<String>,
    /// Execution status, e.g. `AVAILABLE`.
    pub execution_status: String,
    /// Creation time, formatted.
    pub created_at: String,
    /// Resource-level changes.
    pub changes: Vec<ResourceChangeSummary>,
}

/// Terminal outcome of one deployment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The stack did not exist and was created.
    Created {
        /// Stack name.
        stack_name: String,
    },
    /// An update change set was executed to completion.
    Updated {
        /// Stack name.
        stack_name: String,
        /// Executed change set name.
        change_set_name: String,
    },
    /// The provider found nothing to change; the change set was deleted.
    NoChanges {
        /// Stack name.
        stack_name: String,
    },
    /// The reviewer discarded the change set; it was deleted.
    Discarded {
        /// Stack name.
        stack_name: String,
        /// Discarded change set name.
        change_set_name: String,
    },
    /// The reviewer deferred; the change set was left in place.
    Deferred {
        /// Stack name.
        stack_name: String,
        /// Retained change set name.
        change_set_name: String,
    },
    /// Change set creation failed for a non-no-op reason; it was deleted.
    Aborted {
        /// Stack name.
        stack_name: String,
        /// Deleted change set name.
        change_set_name: String,
        /// Provider status reason.
        reason: String,
    },
}

impl DeployOutcome {
    /// Stack name the outcome refers to.
    #[must_use]
    pub fn stack_name(&self) -> &str {
        match self {
            Self::Created { stack_name }
            | Self::Updated { stack_name, .. }
            | Self::NoChanges { stack_name }
            | Self::Discarded { stack_name, .. }
            | Self::Deferred { stack_name, .. }
            | Self::Aborted { stack_name, .. } => stack_name,
        }
    }
}
