//! Scope-partitioned category views over the key index.
//!
//! The views are always rebuilt wholesale from the key index, never patched,
//! so a replaced definition cannot linger under its old category.

use crate::property::{PropertyDefinition, PropertyKey, Scope};
use std::collections::BTreeMap;

/// Category name mapped to the definitions filed under it, in key order.
pub type CategoryMap = BTreeMap<String, Vec<PropertyDefinition>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScopeIndex {
    global: CategoryMap,
    project: CategoryMap,
    module: CategoryMap,
}

impl ScopeIndex {
    /// Group every definition by `resolve(key)` for each scope it applies to.
    pub(crate) fn build<'a, I, F>(definitions: I, resolve: F) -> Self
    where
        I: IntoIterator<Item = &'a PropertyDefinition>,
        F: Fn(&PropertyKey) -> &'a str,
    {
        let mut index = Self::default();
        for definition in definitions {
            let category = resolve(definition.key());
            for scope in Scope::ALL {
                if definition.applies_to(scope) {
                    index
                        .view_mut(scope)
                        .entry(category.to_string())
                        .or_default()
                        .push(definition.clone());
                }
            }
        }
        index
    }

    pub(crate) fn view(&self, scope: Scope) -> &CategoryMap {
        match scope {
            Scope::Global => &self.global,
            Scope::Project => &self.project,
            Scope::Module => &self.module,
        }
    }

    fn view_mut(&mut self, scope: Scope) -> &mut CategoryMap {
        match scope {
            Scope::Global => &mut self.global,
            Scope::Project => &mut self.project,
            Scope::Module => &mut self.module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_land_in_every_matching_scope() {
        let shared = PropertyDefinition::builder("shared")
            .name("Shared")
            .category("general")
            .global(true)
            .project(true)
            .build()
            .unwrap();
        let hidden = PropertyDefinition::builder("hidden")
            .name("Hidden")
            .global(false)
            .build()
            .unwrap();
        let defs = [shared, hidden];

        let index = ScopeIndex::build(defs.iter(), |key| match key.as_str() {
            "shared" => "general",
            _ => "",
        });

        assert_eq!(index.view(Scope::Global)["general"].len(), 1);
        assert_eq!(index.view(Scope::Project)["general"].len(), 1);
        assert!(index.view(Scope::Module).is_empty());
        assert!(!index.view(Scope::Global).contains_key(""));
    }
}
