//! Source content retrieval.
//!
//! Reads config and template documents from either the local filesystem
//! or S3, behind one `read` entry point so callers never branch on the
//! locator kind themselves.

use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::Source;
use crate::error::{Result, StorageError};

/// Reads source documents from local disk or S3.
#[derive(Debug, Clone)]
pub struct SourceReader {
    client: Client,
}

impl SourceReader {
    /// Creates a reader from shared AWS configuration.
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Creates a reader with an existing S3 client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Reads the full content of a source as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the local file cannot be read, the object
    /// cannot be fetched, or the content is not valid UTF-8.
    pub async fn read(&self, source: &Source) -> Result<String> {
        match source {
            Source::Local(path) => {
                debug!("Reading local file: {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
            Source::Remote { bucket, key } => self.fetch_object(bucket, key).await,
        }
    }

    /// Fetches an object from S3 and decodes it as UTF-8.
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<String> {
        debug!("Fetching s3://{bucket}/{key}");

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|sdk_err| {
                let service_err = sdk_err.into_service_error();
                StorageError::fetch_failed(bucket, key, format!("{service_err}"))
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::fetch_failed(bucket, key, format!("{e}")))?;

        let content = String::from_utf8(bytes.to_vec()).map_err(|e| {
            StorageError::DecodeFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: format!("{e}"),
            }
        })?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader() -> SourceReader {
        let config = aws_config::SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .build();
        SourceReader::new(&config)
    }

    #[tokio::test]
    async fn test_read_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "InstanceType: t3.micro").unwrap();

        let source = Source::Local(path);
        let content = reader().read(&source).await.unwrap();
        assert_eq!(content, "InstanceType: t3.micro\n");
    }

    #[tokio::test]
    async fn test_read_missing_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = Source::Local(dir.path().join("absent.yaml"));
        let result = reader().read(&source).await;
        assert!(result.is_err());
    }
}
