//! The property definition value object and its builder.
//!
//! Definitions are immutable once built. Scope flags default to
//! `global = true, project = false, module = false` whenever a source leaves
//! them unspecified, both in the builder and when deserializing.

use crate::property::identity::{PropertyKey, PropertyType, Scope};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPropertyDefinition")]
/// Metadata describing one configurable setting.
pub struct PropertyDefinition {
    key: PropertyKey,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(rename = "type")]
    property_type: PropertyType,
    global: bool,
    project: bool,
    module: bool,
}

// Wire shape of a definition. Unknown fields are errors so a misspelled
// attribute cannot be dropped on the way in.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPropertyDefinition {
    key: PropertyKey,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default_value: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    property_type: PropertyType,
    #[serde(default = "default_global")]
    global: bool,
    #[serde(default)]
    project: bool,
    #[serde(default)]
    module: bool,
}

impl TryFrom<RawPropertyDefinition> for PropertyDefinition {
    type Error = anyhow::Error;

    fn try_from(raw: RawPropertyDefinition) -> Result<Self> {
        let definition = PropertyDefinition {
            key: raw.key,
            name: raw.name,
            description: raw.description,
            default_value: raw.default_value,
            category: raw.category,
            property_type: raw.property_type,
            global: raw.global,
            project: raw.project,
            module: raw.module,
        };
        definition.validate()?;
        Ok(definition)
    }
}

fn default_global() -> bool {
    true
}

impl PropertyDefinition {
    /// Start a builder for `key`. The key is checked when `build` runs.
    pub fn builder(key: impl Into<String>) -> PropertyDefinitionBuilder {
        PropertyDefinitionBuilder {
            key: key.into(),
            name: None,
            description: None,
            default_value: None,
            category: None,
            property_type: PropertyType::default(),
            global: default_global(),
            project: false,
            module: false,
        }
    }

    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// The category declared on the definition itself, if it is non-empty.
    ///
    /// Registries fall back to the contributing component's default category
    /// when this is `None`; see `PropertyDefinitions::category`.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn is_project(&self) -> bool {
        self.project
    }

    pub fn is_module(&self) -> bool {
        self.module
    }

    /// Whether the scope flag matching `scope` is set.
    pub fn applies_to(&self, scope: Scope) -> bool {
        match scope {
            Scope::Global => self.global,
            Scope::Project => self.project,
            Scope::Module => self.module,
        }
    }

    /// Checks the invariants deserialization alone cannot express.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("property {} must have a name", self.key);
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Fluent constructor for [`PropertyDefinition`].
pub struct PropertyDefinitionBuilder {
    key: String,
    name: Option<String>,
    description: Option<String>,
    default_value: Option<String>,
    category: Option<String>,
    property_type: PropertyType,
    global: bool,
    project: bool,
    module: bool,
}

impl PropertyDefinitionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn project(mut self, project: bool) -> Self {
        self.project = project;
        self
    }

    pub fn module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    /// Finish the definition, rejecting a blank key or a missing name.
    pub fn build(self) -> Result<PropertyDefinition> {
        let key = PropertyKey::new(self.key)?;
        let Some(name) = self.name else {
            bail!("property {key} must have a name");
        };
        let definition = PropertyDefinition {
            key,
            name,
            description: self.description,
            default_value: self.default_value,
            category: self.category,
            property_type: self.property_type,
            global: self.global,
            project: self.project,
            module: self.module,
        };
        definition.validate()?;
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_applies_scope_defaults() {
        let def = PropertyDefinition::builder("foo").name("Foo").build().unwrap();
        assert_eq!(def.key().as_str(), "foo");
        assert_eq!(def.name(), "Foo");
        assert!(def.is_global());
        assert!(!def.is_project());
        assert!(!def.is_module());
        assert_eq!(def.default_value(), None);
        assert_eq!(def.category(), None);
        assert_eq!(def.property_type(), &PropertyType::String);
    }

    #[test]
    fn builder_rejects_missing_key_or_name() {
        let err = PropertyDefinition::builder("")
            .name("Nameless key")
            .build()
            .expect_err("blank key should fail");
        assert!(err.to_string().contains("must not be empty"));

        let err = PropertyDefinition::builder("foo")
            .build()
            .expect_err("missing name should fail");
        assert!(err.to_string().contains("foo"));

        assert!(
            PropertyDefinition::builder("foo")
                .name("  ")
                .build()
                .is_err()
        );
    }

    #[test]
    fn empty_category_reads_as_absent() {
        let def = PropertyDefinition::builder("foo")
            .name("Foo")
            .category("")
            .build()
            .unwrap();
        assert_eq!(def.category(), None);
    }

    #[test]
    fn applies_to_follows_flags() {
        let def = PropertyDefinition::builder("module.only")
            .name("Module only")
            .global(false)
            .module(true)
            .build()
            .unwrap();
        assert!(!def.applies_to(Scope::Global));
        assert!(!def.applies_to(Scope::Project));
        assert!(def.applies_to(Scope::Module));
    }

    #[test]
    fn deserialize_uses_same_defaults_as_builder() {
        let def: PropertyDefinition = serde_json::from_value(json!({
            "key": "two",
            "name": "Two",
            "default_value": "2",
            "type": "integer"
        }))
        .unwrap();
        let built = PropertyDefinition::builder("two")
            .name("Two")
            .default_value("2")
            .property_type(PropertyType::Integer)
            .build()
            .unwrap();
        assert_eq!(def, built);
    }

    #[test]
    fn deserialize_rejects_blank_name() {
        let err = serde_json::from_value::<PropertyDefinition>(json!({"key": "k", "name": "  "}))
            .expect_err("blank name should fail");
        assert!(err.to_string().contains("must have a name"));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let err = serde_json::from_value::<PropertyDefinition>(json!({
            "key": "foo",
            "name": "Foo",
            "categroy": "general"
        }))
        .expect_err("misspelled field should fail");
        assert!(err.to_string().contains("categroy"));
    }
}
