//! Capture configuration.
//!
//! The only setting mod authors observe is the marker field name. Options can
//! be built in code or read from a small JSON file shipped with the host.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Marker field recognised when no override is configured.
pub const DEFAULT_MARKER_FIELD: &str = "customJson";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureOptions {
    /// Top-level JSON key whose children are captured.
    pub marker_field: String,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            marker_field: DEFAULT_MARKER_FIELD.to_string(),
        }
    }
}

impl CaptureOptions {
    /// Read and validate options from a JSON file. Missing keys fall back to
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading capture options {}", path.display()))?;
        let options: CaptureOptions = serde_json::from_str(&data)
            .with_context(|| format!("parsing capture options {}", path.display()))?;
        options
            .validate()
            .with_context(|| format!("validating capture options {}", path.display()))?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let marker = &self.marker_field;
        if marker.is_empty() {
            bail!("marker_field must not be empty");
        }
        if !marker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            bail!("marker_field must match ^[A-Za-z0-9_.-]+$, got {marker}");
        }
        Ok(())
    }
}
