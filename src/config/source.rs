//! Source locators for configuration and template documents.
//!
//! A source is either a local filesystem path or an `s3://bucket/key`
//! object locator. Locators are parsed once at the CLI boundary and
//! passed around as typed values.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Scheme marker for remote object locators.
const S3_SCHEME: &str = "s3://";

/// A config or template source: local file or S3 object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// An object in S3.
    Remote {
        /// Bucket name.
        bucket: String,
        /// Object key within the bucket.
        key: String,
    },
}

impl Source {
    /// Returns true if this source lives in object storage.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns the final path segment of the locator, without any
    /// directory components.
    ///
    /// Used to derive the stack name from a template locator.
    #[must_use]
    pub fn final_segment(&self) -> &str {
        let raw = match self {
            Self::Local(path) => path.to_str().unwrap_or_default(),
            Self::Remote { key, .. } => key.as_str(),
        };
        raw.rsplit(['/', '\\']).next().unwrap_or(raw)
    }
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(S3_SCHEME) {
            let (bucket, key) = rest.split_once('/').ok_or_else(|| {
                ConfigError::invalid_locator(s, "expected s3://<bucket>/<key>")
            })?;
            if bucket.is_empty() || key.is_empty() {
                return Err(ConfigError::invalid_locator(
                    s,
                    "bucket and key must be non-empty",
                ));
            }
            Ok(Self::Remote {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        } else if s.is_empty() {
            Err(ConfigError::invalid_locator(s, "empty locator"))
        } else {
            Ok(Self::Local(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote { bucket, key } => write!(f, "{S3_SCHEME}{bucket}/{key}"),
        }
    }
}
