//! The property definition registry.
//!
//! `PropertyDefinitions` merges definitions from many sources into one key
//! index, remembers the default category of the component that contributed
//! each key, and keeps three scope views (global, project, module) grouped by
//! resolved category. Mutation needs `&mut self`, so all building happens
//! before the registry is shared; reads afterwards are plain lookups.

pub mod index;
pub mod options;

pub use index::CategoryMap;
pub use options::{DUPLICATE_KEYS_ENV, DuplicateKeyPolicy, RegistryOptions};

use crate::extract::{Extraction, PropertySource, extract};
use crate::property::{PropertyDefinition, PropertyKey, Scope};
use anyhow::{Context, Result, bail};
use index::ScopeIndex;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
/// Key-indexed property definitions plus derived category views.
pub struct PropertyDefinitions {
    options: RegistryOptions,
    by_key: BTreeMap<PropertyKey, PropertyDefinition>,
    default_categories: BTreeMap<PropertyKey, String>,
    by_category: ScopeIndex,
}

// One batch of extracted definitions waiting to be merged.
struct Pending {
    origin: String,
    extraction: Extraction,
    fallback: Option<String>,
}

impl PropertyDefinitions {
    /// Build a registry from definitions and components using default options.
    ///
    /// No explicit default category is supplied; a component's own declared
    /// category, if any, is used as the fallback for its properties.
    pub fn new<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertySource>,
    {
        Self::with_options(RegistryOptions::default(), sources)
    }

    pub fn with_options<I, S>(options: RegistryOptions, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertySource>,
    {
        let mut registry = Self {
            options,
            ..Self::default()
        };
        let batch = sources
            .into_iter()
            .map(|source| prepare(source.into(), None))
            .collect::<Result<Vec<_>>>()
            .context("building property registry")?;
        registry.merge(batch)?;
        Ok(registry)
    }

    /// Add one more source, using `default_category` as the fallback category
    /// for every property it contributes.
    ///
    /// A non-empty `default_category` takes precedence over a category the
    /// component declares itself. On error the registry is left untouched.
    pub fn add_component(
        &mut self,
        source: impl Into<PropertySource>,
        default_category: &str,
    ) -> Result<&mut Self> {
        let pending = prepare(source.into(), Some(default_category))?;
        self.merge(vec![pending])?;
        Ok(self)
    }

    /// [`PropertyDefinitions::add_component`] for a batch sharing one default
    /// category. Either every source is added or none is.
    pub fn add_components<I, S>(&mut self, sources: I, default_category: &str) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertySource>,
    {
        let batch = sources
            .into_iter()
            .map(|source| prepare(source.into(), Some(default_category)))
            .collect::<Result<Vec<_>>>()?;
        self.merge(batch)?;
        Ok(self)
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Exact lookup; `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<&PropertyDefinition> {
        self.by_key.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Default value of `key`.
    ///
    /// `None` covers both an unknown key and a known key without a default;
    /// use [`PropertyDefinitions::contains_key`] to tell them apart.
    pub fn default_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyDefinition::default_value)
    }

    /// Every registered definition, in key order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &PropertyDefinition> {
        self.by_key.values()
    }

    /// Number of distinct keys registered.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Resolved display category of `key`.
    ///
    /// The definition's own non-empty category wins, then the default
    /// category of the source that contributed it, then `""`. Unknown keys
    /// also resolve to `""`.
    pub fn category(&self, key: &str) -> &str {
        let Some(definition) = self.by_key.get(key) else {
            return "";
        };
        definition
            .category()
            .or_else(|| self.default_categories.get(key).map(String::as_str))
            .unwrap_or("")
    }

    /// Definitions applying to `scope`, grouped by resolved category.
    pub fn properties_by_category(&self, scope: Scope) -> &CategoryMap {
        self.by_category.view(scope)
    }

    pub fn global_properties_by_category(&self) -> &CategoryMap {
        self.properties_by_category(Scope::Global)
    }

    pub fn project_properties_by_category(&self) -> &CategoryMap {
        self.properties_by_category(Scope::Project)
    }

    pub fn module_properties_by_category(&self) -> &CategoryMap {
        self.properties_by_category(Scope::Module)
    }

    fn merge(&mut self, batch: Vec<Pending>) -> Result<()> {
        if self.options.duplicate_keys == DuplicateKeyPolicy::Reject {
            self.check_collisions(&batch)?;
        }

        for pending in batch {
            let Pending {
                origin,
                extraction,
                fallback,
            } = pending;
            let fallback = fallback.or(extraction.default_category);
            tracing::debug!(
                source = %origin,
                count = extraction.definitions.len(),
                default_category = fallback.as_deref().unwrap_or(""),
                "registering property source"
            );
            for definition in extraction.definitions {
                self.insert(&origin, definition, fallback.as_deref());
            }
        }

        self.reindex();
        Ok(())
    }

    fn insert(&mut self, origin: &str, definition: PropertyDefinition, fallback: Option<&str>) {
        let key = definition.key().clone();
        match fallback {
            Some(category) => {
                self.default_categories
                    .insert(key.clone(), category.to_string());
            }
            None => {
                self.default_categories.remove(&key);
            }
        }
        if self.by_key.insert(key.clone(), definition).is_some() {
            tracing::warn!(
                key = %key,
                source = %origin,
                "property redeclared; keeping the latest definition"
            );
        }
    }

    // Validates a whole batch before anything is inserted so a rejected
    // collision never leaves a partial merge behind.
    fn check_collisions(&self, batch: &[Pending]) -> Result<()> {
        let mut claimed: BTreeMap<&PropertyKey, &str> = BTreeMap::new();
        for pending in batch {
            for definition in &pending.extraction.definitions {
                let key = definition.key();
                if self.by_key.contains_key(key) {
                    bail!(
                        "{} redeclares property {key}, which is already registered",
                        pending.origin
                    );
                }
                if let Some(first) = claimed.insert(key, &pending.origin) {
                    bail!(
                        "{} redeclares property {key}, already declared by {first}",
                        pending.origin
                    );
                }
            }
        }
        Ok(())
    }

    fn reindex(&mut self) {
        let index = ScopeIndex::build(self.by_key.values(), |key| self.category(key.as_str()));
        tracing::debug!(
            definitions = self.by_key.len(),
            global = index.view(Scope::Global).len(),
            project = index.view(Scope::Project).len(),
            module = index.view(Scope::Module).len(),
            "rebuilt category views"
        );
        self.by_category = index;
    }
}

fn prepare(source: PropertySource, default_category: Option<&str>) -> Result<Pending> {
    let origin = source.describe();
    let extraction = extract(source).with_context(|| format!("extracting {origin}"))?;
    Ok(Pending {
        origin,
        extraction,
        fallback: default_category
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    })
}
