#![allow(dead_code)]

use anyhow::Result;
use propdefs::{Declaration, DeclaresProperties, PropertyDefinition};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn property(key: &str, name: &str) -> PropertyDefinition {
    PropertyDefinition::builder(key)
        .name(name)
        .build()
        .expect("fixture definition")
}

pub fn scoped(key: &str, category: &str, global: bool, project: bool, module: bool) -> PropertyDefinition {
    PropertyDefinition::builder(key)
        .name(key)
        .category(category)
        .global(global)
        .project(project)
        .module(module)
        .build()
        .expect("fixture definition")
}

/// Declares `foo` on its own.
pub struct PluginWithProperty;

impl DeclaresProperties for PluginWithProperty {
    fn declaration() -> Declaration {
        property("foo", "Foo").into()
    }
}

/// Declares `one` and `two` (with a default value).
pub struct PluginWithProperties;

impl DeclaresProperties for PluginWithProperties {
    fn declaration() -> Declaration {
        vec![
            property("one", "One"),
            PropertyDefinition::builder("two")
                .name("Two")
                .default_value("2")
                .build()
                .expect("fixture definition"),
        ]
        .into()
    }
}

/// One categorized and one uncategorized property.
pub struct Categories;

impl DeclaresProperties for Categories {
    fn declaration() -> Declaration {
        vec![
            PropertyDefinition::builder("inCateg")
                .name("In Categ")
                .category("categ")
                .build()
                .expect("fixture definition"),
            property("noCateg", "No categ"),
        ]
        .into()
    }
}

/// Five properties spread across the three scopes.
pub struct ByCategory;

impl DeclaresProperties for ByCategory {
    fn declaration() -> Declaration {
        by_category_definitions().into()
    }

    fn component_name() -> String {
        "by-category".to_string()
    }
}

pub fn by_category_definitions() -> Vec<PropertyDefinition> {
    vec![
        scoped("global1", "catGlobal1", true, false, false),
        scoped("global2", "catGlobal1", true, false, false),
        scoped("global3", "catGlobal2", true, false, false),
        scoped("project", "catProject", false, true, false),
        scoped("module", "catModule", false, false, true),
    ]
}

pub fn write_manifest(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;
    Ok(file)
}
