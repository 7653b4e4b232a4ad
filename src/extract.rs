//! Turns property sources into flat lists of definitions.
//!
//! A source is either a ready-made [`PropertyDefinition`] or a [`Component`]
//! carrying an explicit [`Declaration`]. Types that always declare the same
//! properties implement [`DeclaresProperties`] so a discovery layer can hand
//! over `Component::of::<T>()` without instantiating anything.

use crate::property::{PropertyDefinition, PropertyKey};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Property declarations attached to one component.
pub enum Declaration {
    /// A component declaring exactly one property.
    Property(PropertyDefinition),
    /// A component declaring a list of properties.
    Properties { properties: Vec<PropertyDefinition> },
}

impl Declaration {
    pub fn into_definitions(self) -> Vec<PropertyDefinition> {
        match self {
            Declaration::Property(definition) => vec![definition],
            Declaration::Properties { properties } => properties,
        }
    }
}

impl From<PropertyDefinition> for Declaration {
    fn from(definition: PropertyDefinition) -> Self {
        Declaration::Property(definition)
    }
}

impl From<Vec<PropertyDefinition>> for Declaration {
    fn from(properties: Vec<PropertyDefinition>) -> Self {
        Declaration::Properties { properties }
    }
}

/// Type-level property declarations.
///
/// Implemented by component types (plugins, extensions) whose declarations
/// do not depend on instance state.
pub trait DeclaresProperties {
    fn declaration() -> Declaration;

    fn component_name() -> String {
        std::any::type_name::<Self>().to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Explicit descriptor for something that declares properties.
pub struct Component {
    pub name: String,
    /// Default category the component declares for its own properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub declaration: Declaration,
}

impl Component {
    pub fn new(name: impl Into<String>, declaration: impl Into<Declaration>) -> Self {
        Self {
            name: name.into(),
            category: None,
            declaration: declaration.into(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Descriptor for a component type.
    pub fn of<T: DeclaresProperties>() -> Self {
        Self::new(T::component_name(), T::declaration())
    }

    /// Descriptor for a live component instance.
    pub fn from_instance<T: DeclaresProperties>(_instance: &T) -> Self {
        Self::of::<T>()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Anything the registry can ingest.
pub enum PropertySource {
    Definition(PropertyDefinition),
    Component(Component),
}

impl PropertySource {
    /// Label used in errors and trace events.
    pub fn describe(&self) -> String {
        match self {
            PropertySource::Definition(definition) => format!("definition {}", definition.key()),
            PropertySource::Component(component) => format!("component {}", component.name),
        }
    }
}

impl From<PropertyDefinition> for PropertySource {
    fn from(definition: PropertyDefinition) -> Self {
        PropertySource::Definition(definition)
    }
}

impl From<Component> for PropertySource {
    fn from(component: Component) -> Self {
        PropertySource::Component(component)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Definitions found on one source plus its declared default category.
pub struct Extraction {
    pub definitions: Vec<PropertyDefinition>,
    pub default_category: Option<String>,
}

/// Flatten a source into its definitions.
///
/// Fails when a definition has no usable name or when one component declares
/// the same key twice; nothing is silently dropped or overwritten here.
pub fn extract(source: PropertySource) -> Result<Extraction> {
    match source {
        PropertySource::Definition(definition) => {
            definition.validate()?;
            Ok(Extraction {
                definitions: vec![definition],
                default_category: None,
            })
        }
        PropertySource::Component(component) => {
            let Component {
                name,
                category,
                declaration,
            } = component;
            let definitions = declaration.into_definitions();

            {
                let mut seen: BTreeSet<&PropertyKey> = BTreeSet::new();
                for definition in &definitions {
                    definition.validate()?;
                    if !seen.insert(definition.key()) {
                        bail!(
                            "component {name} declares property {} more than once",
                            definition.key()
                        );
                    }
                }
            }

            tracing::trace!(
                component = %name,
                count = definitions.len(),
                "extracted property declarations"
            );
            Ok(Extraction {
                definitions,
                default_category: category.filter(|c| !c.is_empty()),
            })
        }
    }
}
