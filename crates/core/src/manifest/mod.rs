//! Manifest (`package.json`) loading
//!
//! Only the parts the engine needs are extracted: declared scripts, in
//! declaration order, and the declared dependency sets.

pub mod reader;

pub use reader::ManifestReader;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "package.json";

/// A script declared in the manifest's `scripts` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub body: String,
}

/// Which block a dependency was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Production,
    Development,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub name: String,
    pub version_range: String,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub name: Option<String>,
    pub scripts: Vec<Script>,
    pub dependencies: Vec<DeclaredDependency>,
    pub dev_dependencies: Vec<DeclaredDependency>,
}

#[derive(Deserialize)]
struct RawManifest {
    name: Option<Value>,
    #[serde(default)]
    scripts: Option<Map<String, Value>>,
    #[serde(default)]
    dependencies: Option<Map<String, Value>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<Map<String, Value>>,
}

impl Manifest {
    /// Parse manifest text. `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(text).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        // Non-string script bodies are not runnable, skip them
        let scripts = raw
            .scripts
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, body)| match body {
                Value::String(body) => Some(Script { name, body }),
                _ => None,
            })
            .collect();

        Ok(Self {
            name: raw.name.and_then(|n| n.as_str().map(str::to_string)),
            scripts,
            dependencies: declared(raw.dependencies, DependencyKind::Production),
            dev_dependencies: declared(raw.dev_dependencies, DependencyKind::Development),
        })
    }

    pub fn script(&self, name: &str) -> Option<&Script> {
        self.scripts.iter().find(|script| script.name == name)
    }

    /// Both dependency blocks, production first. Entries keep their kind so a
    /// name declared in both blocks stays distinguishable.
    pub fn wanted_dependencies(&self) -> impl Iterator<Item = &DeclaredDependency> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }
}

fn declared(block: Option<Map<String, Value>>, kind: DependencyKind) -> Vec<DeclaredDependency> {
    block
        .unwrap_or_default()
        .into_iter()
        .map(|(name, range)| DeclaredDependency {
            name,
            version_range: match range {
                Value::String(range) => range,
                other => other.to_string(),
            },
            kind,
        })
        .collect()
}
