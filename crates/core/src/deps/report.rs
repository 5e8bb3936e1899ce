use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const PROBLEM_PREFIXES: [&str; 3] = ["missing:", "invalid:", "extraneous:"];

/// Per-package entry of the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleStatus {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub invalid: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub extraneous: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub missing: bool,
}

/// Snapshot of `npm ls --depth 0 --json` output
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstalledModuleReport {
    #[serde(default, deserialize_with = "truthy")]
    pub invalid: bool,
    #[serde(default)]
    pub problems: Vec<String>,
    /// Entries in the report's own key order
    #[serde(default, deserialize_with = "ordered_modules")]
    pub dependencies: Vec<(String, ModuleStatus)>,
}

impl InstalledModuleReport {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::Report)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleStatus> {
        self.dependencies
            .iter()
            .find(|(module, _)| module == name)
            .map(|(_, status)| status)
    }

    /// Problems tagged `missing:`, `invalid:` or `extraneous:`
    pub fn tagged_problems(&self) -> impl Iterator<Item = &str> {
        self.problems
            .iter()
            .map(String::as_str)
            .filter(|problem| PROBLEM_PREFIXES.iter().any(|prefix| problem.starts_with(prefix)))
    }
}

/// Newer npm versions report `invalid` as an explanatory string instead of `true`
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => !text.is_empty(),
        _ => false,
    })
}

fn ordered_modules<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, ModuleStatus)>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();

    // A malformed entry carries no flags rather than failing the whole report
    Ok(entries
        .into_iter()
        .map(|(name, value)| {
            let status = serde_json::from_value(value).unwrap_or_default();
            (name, status)
        })
        .collect())
}
