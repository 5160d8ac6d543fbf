//! Parameter reconciliation.
//!
//! This module matches the merged config mapping against the parameter
//! names the template declares, producing the parameter list sent with
//! create and change set requests. Declared parameters with no config
//! value are skipped; the provider applies template defaults or rejects
//! the request itself.

use tracing::{debug, info};

use crate::cloudformation::{ParameterEntry, StackOperations, TemplateSummary};
use crate::config::ConfigMap;
use crate::error::Result;

/// Capability sent for SAM templates when the provider reports none.
const FALLBACK_SAM_CAPABILITY: &str = "CAPABILITY_IAM";

/// Resolves template parameters against the merged config mapping.
pub struct ParameterReconciler<'a> {
    ops: &'a dyn StackOperations,
}

/// What reconciliation feeds into the deployment request.
#[derive(Debug, Clone)]
pub struct ResolvedParameters {
    /// Parameters in template declaration order.
    pub parameters: Vec<ParameterEntry>,
    /// Capability acknowledgments to send.
    pub capabilities: Vec<String>,
    /// The template body, passed through unchanged.
    pub template_body: String,
}

impl<'a> ParameterReconciler<'a> {
    /// Creates a reconciler over the given provider operations.
    #[must_use]
    pub const fn new(ops: &'a dyn StackOperations) -> Self {
        Self { ops }
    }

    /// Validates the template and resolves its parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the template.
    pub async fn resolve(
        &self,
        config: &ConfigMap,
        template_body: String,
        sam: bool,
    ) -> Result<ResolvedParameters> {
        let summary = self.ops.validate_template(&template_body).await?;

        let parameters = match_parameters(&summary.parameter_keys, config);
        let capabilities = resolve_capabilities(&summary, sam);

        info!(
            "Resolved {} of {} declared parameter(s)",
            parameters.len(),
            summary.parameter_keys.len()
        );

        Ok(ResolvedParameters {
            parameters,
            capabilities,
            template_body,
        })
    }
}

/// Intersects declared parameter names with the config mapping.
///
/// Output order follows the declared list. Declared names missing from
/// the config are skipped silently.
fn match_parameters(declared: &[String], config: &ConfigMap) -> Vec<ParameterEntry> {
    let mut parameters = Vec::with_capacity(declared.len());

    for key in declared {
        match config.resolve(key) {
            Some(value) => parameters.push(ParameterEntry::new(key, value)),
            None => debug!("Declared parameter '{key}' has no config value, skipping"),
        }
    }

    parameters
}

/// Picks the capabilities to send with the request.
///
/// The provider-reported list wins when non-empty. A SAM template with
/// no reported capabilities still needs the IAM acknowledgment.
fn resolve_capabilities(summary: &TemplateSummary, sam: bool) -> Vec<String> {
    if !summary.capabilities.is_empty() {
        summary.capabilities.clone()
    } else if sam {
        vec![FALLBACK_SAM_CAPABILITY.to_string()]
    } else {
        Vec::new()
    }
}
