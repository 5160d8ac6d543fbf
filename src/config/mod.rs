//! Configuration handling for Stackforge.
//!
//! Covers source locators (local path or `s3://` URI), the merged
//! key/value mapping built from YAML config documents, and the loading
//! routines that feed both the mapping and the raw template body.

mod loader;
mod map;
mod source;

pub use loader::{load_config, load_template};
pub use map::ConfigMap;
pub use source::Source;
