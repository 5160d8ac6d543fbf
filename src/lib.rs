// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Stackforge
//!
//! A command-line deployment helper for AWS `CloudFormation` stacks.
//!
//! ## Overview
//!
//! Stackforge loads a template and one or more YAML config documents
//! (from local disk or S3), validates the template with the provider,
//! matches config keys against the template's declared parameters, and
//! then creates the stack or updates it through a change set:
//!
//! 1. **Load**: merge config sources in order (later overwrites earlier)
//!    and read the raw template body.
//! 2. **Reconcile**: validate the template, intersect its declared
//!    parameters with the config mapping, resolve capabilities.
//! 3. **Deploy**: create the stack if it does not exist; otherwise
//!    create a change set, optionally gate it behind an interactive
//!    review, and execute or clean it up.
//!
//! All waiting is delegated to the provider's waiters; nothing is
//! persisted locally between runs.
//!
//! ## Modules
//!
//! - [`config`]: source locators, config merging, template loading
//! - [`storage`]: reading sources from local disk or S3
//! - [`cloudformation`]: provider operations, client, and orchestration
//! - [`params`]: parameter reconciliation against the config mapping
//! - [`review`]: interactive change set review
//! - [`cli`]: command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # conf/prod.yaml - keys matching template parameters are sent through
//! InstanceType: m5.large
//! MinSize: 2
//! Subnets:
//!   - subnet-aaa
//!   - subnet-bbb
//! ```
//!
//! ```bash
//! stackforge deploy -c conf/base.yaml -c conf/prod.yaml \
//!     -t templates/my-app.yaml -e prod
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod cloudformation;
pub mod config;
pub mod error;
pub mod params;
pub mod review;
pub mod storage;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, PromptStyle, Reporter};
pub use cloudformation::{
    CfnClient, DeployOutcome, StackDeployer, StackOperations, StackRequest, derive_stack_name,
};
pub use config::{ConfigMap, Source};
pub use error::{Result, StackforgeError};
pub use params::{ParameterReconciler, ResolvedParameters};
pub use review::{ChangeSetReviewer, MenuReviewer, ReviewDecision, TokenReviewer};
pub use storage::SourceReader;
