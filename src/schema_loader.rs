//! Bundled JSON Schema for property manifests.
//!
//! The schema ships inside the crate so validation never depends on the
//! working directory. Its `schema_version` const must match the version this
//! build understands; a mismatch is a packaging bug and fails loudly.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::sync::OnceLock;

/// Manifest format version this build reads and writes.
pub const MANIFEST_SCHEMA_VERSION: &str = "property_manifest_v1";

const MANIFEST_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schema/property_manifest.schema.json"
));

const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Compiled manifest schema plus the version it pins.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Compiled manifest schema, built on first use and shared afterwards.
pub(crate) fn manifest_schema() -> Result<&'static SchemaLoadResult> {
    static SCHEMA: OnceLock<Result<SchemaLoadResult, String>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| load_manifest_schema().map_err(|err| format!("{err:#}")))
        .as_ref()
        .map_err(|err| anyhow!("{err}"))
}

fn load_manifest_schema() -> Result<SchemaLoadResult> {
    let raw: Value =
        serde_json::from_str(MANIFEST_SCHEMA).context("parsing bundled manifest schema")?;

    let schema_version = extract_schema_version(&raw, SCHEMA_VERSION_POINTER)
        .ok_or_else(|| anyhow!("bundled manifest schema missing schema_version const"))?;
    if schema_version != MANIFEST_SCHEMA_VERSION {
        bail!(
            "bundled manifest schema pins '{}' but this build expects '{}'",
            schema_version,
            MANIFEST_SCHEMA_VERSION
        );
    }

    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&raw)
        .map_err(|err| anyhow!("compiling bundled manifest schema: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `document` and report every violation at once.
pub(crate) fn validate_document(
    schema: &SchemaLoadResult,
    document: &Value,
    label: &str,
) -> Result<()> {
    if let Err(errors) = schema.compiled.validate(document) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "property manifest {} failed schema validation ({}):\n{}",
            label,
            schema.schema_version,
            details
        );
    }
    Ok(())
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if is_version_token(version) {
        Some(version.to_string())
    } else {
        None
    }
}

pub(crate) fn is_version_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_schema_compiles_and_pins_version() {
        let schema = load_manifest_schema().unwrap();
        assert_eq!(schema.schema_version, MANIFEST_SCHEMA_VERSION);
    }

    #[test]
    fn compiled_schema_is_shared_between_calls() {
        let first = manifest_schema().unwrap();
        let second = manifest_schema().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn validation_lists_offending_paths() {
        let schema = manifest_schema().unwrap();
        let doc = json!({
            "schema_version": MANIFEST_SCHEMA_VERSION,
            "sources": [{"definition": {"key": "", "name": "Blank"}}]
        });
        let err = validate_document(schema, &doc, "inline").expect_err("blank key");
        assert!(err.to_string().contains("/sources/0/definition/key"));
    }

    #[test]
    fn version_tokens_are_restricted() {
        assert!(is_version_token("property_manifest_v1"));
        assert!(!is_version_token(""));
        assert!(!is_version_token("v1 beta"));
    }
}
