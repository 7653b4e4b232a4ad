use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Process-unique identifier of a property definition (e.g., `sonar.host.url`).
///
/// Never empty: both [`PropertyKey::new`] and deserialization reject blank
/// keys so every key that reaches a registry is usable for lookups.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyKey(String);

impl PropertyKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            bail!("property key must not be empty");
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PropertyKey {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PropertyKey> for String {
    fn from(key: PropertyKey) -> Self {
        key.0
    }
}

// Lets registries look keys up by `&str` without allocating.
impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared value type of a property.
///
/// Purely descriptive: the registry never checks values against it. `Other`
/// keeps labels this crate does not know about intact.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PropertyType {
    #[default]
    String,
    Text,
    Password,
    Boolean,
    Integer,
    Float,
    SingleSelectList,
    Other(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Text => "text",
            PropertyType::Password => "password",
            PropertyType::Boolean => "boolean",
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
            PropertyType::SingleSelectList => "single_select_list",
            PropertyType::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "string" => PropertyType::String,
            "text" => PropertyType::Text,
            "password" => PropertyType::Password,
            "boolean" => PropertyType::Boolean,
            "integer" => PropertyType::Integer,
            "float" => PropertyType::Float,
            "single_select_list" => PropertyType::SingleSelectList,
            other => PropertyType::Other(other.to_string()),
        }
    }
}

impl Serialize for PropertyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

/// Deployment level a property applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Scope {
    Global,
    Project,
    Module,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Global, Scope::Project, Scope::Module];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Project => "project",
            Scope::Module => "module",
        }
    }
}
