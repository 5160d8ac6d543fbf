//! Loading of config and template documents.
//!
//! Config sources are merged best-effort: a source that cannot be read
//! or parsed is logged and skipped, and the run continues with whatever
//! merged. The template is different: without it nothing downstream can
//! work, so a template load failure aborts the run.

use tracing::{debug, error, info};

use crate::error::{Result, TemplateError};
use crate::storage::SourceReader;

use super::map::ConfigMap;
use super::source::Source;

/// Loads and merges all config sources in input order.
///
/// Later sources overwrite earlier keys. Per-source failures are logged
/// at error level and skipped; the returned mapping may be partial or
/// empty.
pub async fn load_config(reader: &SourceReader, sources: &[Source]) -> ConfigMap {
    let mut map = ConfigMap::new();

    for source in sources {
        let uri = source.to_string();
        debug!("Loading config source: {uri}");

        let content = match reader.read(source).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to load config {uri}: {e}");
                continue;
            }
        };

        match map.merge_document(&uri, &content) {
            Ok(()) => debug!("Merged config source: {uri}"),
            Err(e) => error!("Failed to parse config {uri}: {e}"),
        }
    }

    info!("Merged {} config key(s) from {} source(s)", map.len(), sources.len());
    map
}

/// Loads the template body as raw text.
///
/// # Errors
///
/// Returns an error if the template cannot be read or is empty.
pub async fn load_template(reader: &SourceReader, source: &Source) -> Result<String> {
    let uri = source.to_string();
    debug!("Loading template: {uri}");

    let body = reader.read(source).await.map_err(|e| {
        error!("Failed to load template {uri}: {e}");
        TemplateError::load_failed(&uri, format!("{e}"))
    })?;

    if body.trim().is_empty() {
        return Err(TemplateError::Empty { uri }.into());
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_file(path: &Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{content}").unwrap();
    }

    fn reader() -> SourceReader {
        let config = aws_config::SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .build();
        SourceReader::new(&config)
    }

    #[tokio::test]
    async fn test_load_config_merges_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().join("base.yaml");
        let prod = dir.path().join("prod.yaml");
        write_file(&base, "InstanceType: t3.micro\nMinSize: 2\n");
        write_file(&prod, "InstanceType: m5.large\n");

        let sources = vec![Source::Local(base), Source::Local(prod)];
        let map = load_config(&reader(), &sources).await;

        assert_eq!(map.resolve("InstanceType"), Some("m5.large".to_string()));
        assert_eq!(map.resolve("MinSize"), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_load_config_skips_unreadable_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.yaml");
        write_file(&good, "Key: value\n");

        let sources = vec![
            Source::Local(dir.path().join("missing.yaml")),
            Source::Local(good),
        ];
        let map = load_config(&reader(), &sources).await;

        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve("Key"), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_load_config_skips_unparseable_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("bad.yaml");
        let good = dir.path().join("good.yaml");
        write_file(&bad, "key: [unclosed\n");
        write_file(&good, "Key: value\n");

        let sources = vec![Source::Local(bad), Source::Local(good)];
        let map = load_config(&reader(), &sources).await;

        assert_eq!(map.len(), 1);
    }

    #[tokio::test]
    async fn test_load_config_tolerates_all_sources_failing() {
        let dir = tempfile::TempDir::new().unwrap();
        let sources = vec![Source::Local(dir.path().join("absent.yaml"))];
        let map = load_config(&reader(), &sources).await;
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_load_template_returns_raw_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        write_file(&path, "Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\n");

        let body = load_template(&reader(), &Source::Local(path)).await.unwrap();
        assert!(body.starts_with("Resources:"));
    }

    #[tokio::test]
    async fn test_load_template_missing_is_hard_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = Source::Local(dir.path().join("absent.yaml"));
        let result = load_template(&reader(), &source).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_template_empty_is_hard_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        write_file(&path, "  \n");

        let result = load_template(&reader(), &Source::Local(path)).await;
        assert!(result.is_err());
    }
}
