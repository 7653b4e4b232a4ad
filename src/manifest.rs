//! JSON manifests of property sources.
//!
//! A discovery layer that finds components out of process can write them as
//! a manifest and hand the file to [`PropertyDefinitions::load`]. Manifests
//! are checked against the bundled schema before `serde` sees them, so shape
//! errors come back with JSON pointers instead of the first serde failure.

use crate::extract::PropertySource;
use crate::registry::{PropertyDefinitions, RegistryOptions};
use crate::schema_loader::{
    MANIFEST_SCHEMA_VERSION, is_version_token, manifest_schema, validate_document,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Serialized list of property sources.
pub struct PropertyManifest {
    pub schema_version: String,
    pub sources: Vec<PropertySource>,
}

impl PropertyManifest {
    /// Manifest at the current schema version.
    pub fn new(sources: Vec<PropertySource>) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
            sources,
        }
    }

    /// Build a registry from the manifest's sources, in manifest order.
    pub fn into_registry(self, options: RegistryOptions) -> Result<PropertyDefinitions> {
        PropertyDefinitions::with_options(options, self.sources)
    }
}

/// Parse and validate a manifest held in memory.
pub fn parse_manifest(text: &str) -> Result<PropertyManifest> {
    let value: Value = serde_json::from_str(text).context("parsing property manifest")?;
    manifest_from_value(value, "<inline>")
}

/// Read, validate, and parse a manifest from disk.
pub fn load_manifest_from_path(path: &Path) -> Result<PropertyManifest> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing property manifest {}", path.display()))?;
    manifest_from_value(value, &path.display().to_string())
}

impl PropertyDefinitions {
    /// Build a registry from a manifest file, taking options from the
    /// environment (see [`RegistryOptions::from_env`]).
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_options(path, RegistryOptions::from_env()?)
    }

    pub fn load_with_options(path: &Path, options: RegistryOptions) -> Result<Self> {
        let manifest = load_manifest_from_path(path)?;
        let registry = manifest
            .into_registry(options)
            .with_context(|| format!("registering properties from {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            definitions = registry.len(),
            "loaded property manifest"
        );
        Ok(registry)
    }
}

fn manifest_from_value(value: Value, label: &str) -> Result<PropertyManifest> {
    validate_schema_version(&value, label)?;
    let schema = manifest_schema()?;
    validate_document(schema, &value, label)?;
    serde_json::from_value(value).with_context(|| format!("decoding property manifest {label}"))
}

// Checked ahead of schema validation so a version mismatch is reported as
// such rather than as a failed `const`.
fn validate_schema_version(value: &Value, label: &str) -> Result<()> {
    let Some(version) = value.get("schema_version").and_then(Value::as_str) else {
        bail!("property manifest {label} is missing schema_version");
    };
    if !is_version_token(version) {
        bail!("schema_version must match ^[A-Za-z0-9_.-]+$, got '{version}'");
    }
    if version != MANIFEST_SCHEMA_VERSION {
        bail!(
            "property manifest {label} has schema_version '{version}', expected '{MANIFEST_SCHEMA_VERSION}'"
        );
    }
    Ok(())
}
