//! Property-metadata registry.
//!
//! The crate merges property declarations from many sources (explicit
//! definitions, or components carrying declarations) into one
//! [`PropertyDefinitions`] registry. The registry answers key lookups,
//! resolves each property's display category with a per-component fallback,
//! and groups definitions by category for the global, project, and module
//! scopes.
//!
//! Finding components is the caller's job; the registry only consumes an
//! assembled list of sources, either built in code or read from a JSON
//! manifest (see [`manifest`]).

pub mod extract;
pub mod manifest;
pub mod property;
pub mod registry;
mod schema_loader;

pub use extract::{
    Component, Declaration, DeclaresProperties, Extraction, PropertySource, extract,
};
pub use manifest::{PropertyManifest, load_manifest_from_path, parse_manifest};
pub use property::{PropertyDefinition, PropertyDefinitionBuilder, PropertyKey, PropertyType, Scope};
pub use registry::{
    CategoryMap, DUPLICATE_KEYS_ENV, DuplicateKeyPolicy, PropertyDefinitions, RegistryOptions,
};
pub use schema_loader::MANIFEST_SCHEMA_VERSION;
