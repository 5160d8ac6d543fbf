//! Change set review.
//!
//! When an update is not auto-approved, the pending change set is shown
//! to the user, who decides whether to execute it, discard it, or leave
//! it in place for later. Two prompt styles implement the same
//! interface and are selected by CLI flag.

mod prompt;

use async_trait::async_trait;

use crate::cloudformation::ChangeSetDescription;
use crate::error::Result;

pub use prompt::{MenuReviewer, TokenReviewer};

/// The reviewer's verdict on a pending change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Execute the change set now.
    Execute,
    /// Delete the change set without executing it.
    Discard,
    /// Leave the change set on the provider side, untouched.
    Defer,
}

/// Collects an execute/discard/defer decision for a pending change set.
#[async_trait]
pub trait ChangeSetReviewer: Send + Sync {
    /// Shows the change set to the user and returns their decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the interactive session fails, e.g. stdin
    /// closes before a valid answer arrives.
    async fn review(&self, change_set: &ChangeSetDescription) -> Result<ReviewDecision>;
}
