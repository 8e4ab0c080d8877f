use crate::lint::LintError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Settings for a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub enabled: bool,

    /// Qualified string ids (`relative/path.xliff:unit-id`) the check skips
    pub exclusions: BTreeSet<String>,

    /// Literal brand names (only used by the `brands` check)
    pub brand_names: Vec<String>,
}

impl CheckConfig {
    /// Enabled, with the given exclusions.
    pub fn enabled_with<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            exclusions: exclusions.into_iter().map(Into::into).collect(),
            brand_names: Vec::new(),
        }
    }

    /// Whether the check runs for `string_id`.
    pub fn applies_to(&self, string_id: &str) -> bool {
        self.enabled && !self.exclusions.contains(string_id)
    }
}

/// Linter configuration. Unknown sections are ignored; a missing section is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub placeables: CheckConfig,
    pub ellipsis: CheckConfig,
    pub quotes: CheckConfig,
    pub brands: CheckConfig,
}

impl LintConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the configuration file.
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let content = std::fs::read_to_string(path).map_err(|source| LintError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| LintError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
