//! Property definition types.
//!
//! `identity` holds the small typed values (keys, value types, scopes) and
//! `model` the definition itself plus its builder.

pub mod identity;
pub mod model;

pub use identity::{PropertyKey, PropertyType, Scope};
pub use model::{PropertyDefinition, PropertyDefinitionBuilder};
