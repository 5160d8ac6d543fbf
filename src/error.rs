//! Error types for the Stackforge deployment tool.
//!
//! This module provides the error hierarchy for all operations in the
//! deployment flow: configuration loading, template handling, object
//! storage, and the `CloudFormation` API.

use thiserror::Error;

/// The main error type for Stackforge operations.
#[derive(Debug, Error)]
pub enum StackforgeError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Template-related errors.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Object storage errors.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// `CloudFormation` API errors.
    #[error("CloudFormation error: {0}")]
    Cfn(#[from] CfnError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or parsed.
    #[error("Failed to load configuration from {uri}: {message}")]
    LoadFailed {
        /// Locator of the failing source.
        uri: String,
        /// Description of the failure.
        message: String,
    },

    /// A source locator could not be parsed.
    #[error("Invalid source locator: {uri}: {message}")]
    InvalidLocator {
        /// The locator as given.
        uri: String,
        /// Description of the parse problem.
        message: String,
    },
}

/// Template-related errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template could not be read.
    #[error("Failed to load template from {uri}: {message}")]
    LoadFailed {
        /// Locator of the template.
        uri: String,
        /// Description of the failure.
        message: String,
    },

    /// The template was read but contains no content.
    #[error("Template is empty: {uri}")]
    Empty {
        /// Locator of the template.
        uri: String,
    },
}

/// Object storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An object could not be fetched.
    #[error("Failed to fetch s3://{bucket}/{key}: {message}")]
    FetchFailed {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Description of the failure.
        message: String,
    },

    /// An object body was not valid UTF-8.
    #[error("Object s3://{bucket}/{key} is not valid UTF-8: {message}")]
    DecodeFailed {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Description of the decode failure.
        message: String,
    },
}

/// `CloudFormation` API errors.
#[derive(Debug, Error)]
pub enum CfnError {
    /// The provider rejected the template.
    #[error("Template validation failed: {message}")]
    ValidationFailed {
        /// Error message from the provider.
        message: String,
    },

    /// An API request failed.
    #[error("CloudFormation {operation} failed: {message}")]
    RequestFailed {
        /// Name of the failing operation.
        operation: String,
        /// Error message from the provider.
        message: String,
    },

    /// A waiter did not reach its terminal state.
    #[error("Timed out waiting for {operation} on {name}: {message}")]
    WaitFailed {
        /// Operation being awaited.
        operation: String,
        /// Stack or change set name.
        name: String,
        /// Description of the wait failure.
        message: String,
    },
}

/// Result type alias for Stackforge operations.
pub type Result<T> = std::result::Result<T, StackforgeError>;

impl StackforgeError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a load error for the given source locator.
    #[must_use]
    pub fn load_failed(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadFailed {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Creates a locator parse error.
    #[must_use]
    pub fn invalid_locator(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLocator {
            uri: uri.into(),
            message: message.into(),
        }
    }
}

impl TemplateError {
    /// Creates a load error for the given template locator.
    #[must_use]
    pub fn load_failed(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadFailed {
            uri: uri.into(),
            message: message.into(),
        }
    }
}

impl StorageError {
    /// Creates a fetch error for the given object.
    #[must_use]
    pub fn fetch_failed(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::FetchFailed {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

impl CfnError {
    /// Creates a validation error with the given provider message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Creates a request error for the given operation.
    #[must_use]
    pub fn request(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a wait error for the given operation and target.
    #[must_use]
    pub fn wait(
        operation: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::WaitFailed {
            operation: operation.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}
