//! Merge linter configuration files.
//!
//! Integrates the `exclusions` and `brand_names` arrays of a source config
//! into a target config. `enabled` flags stay as they are in the target.

use crate::lint::LintError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

const ARRAY_KEYS: [&str; 2] = ["exclusions", "brand_names"];

/// Something worth telling the user about a merge; never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeNote {
    /// Element present in the target but not in the source
    TargetOnly {
        section: String,
        key: String,
        element: String,
    },

    /// Section present in the target but missing or empty in the source
    SectionSkipped { section: String },
}

impl fmt::Display for MergeNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeNote::TargetOnly {
                section,
                key,
                element,
            } => write!(
                f,
                "Note: In section '{}', element '{}' in '{}' is available in target file but not in source.",
                section, element, key
            ),
            MergeNote::SectionSkipped { section } => write!(
                f,
                "Warning: Section '{}' exists in target file but not in source. Skipping merge for this section.",
                section
            ),
        }
    }
}

/// Union the arrays of `source` into `target`, section by section.
///
/// Only arrays already present in a target section are merged. Merged arrays
/// are sorted case-insensitively.
pub fn merge_configs(source: &Value, target: &mut Value) -> Vec<MergeNote> {
    let mut notes = Vec::new();
    let Some(target_sections) = target.as_object_mut() else {
        return notes;
    };

    for (section, target_section) in target_sections.iter_mut() {
        match source.get(section).and_then(Value::as_object) {
            Some(source_section) if !source_section.is_empty() => {
                if let Some(target_section) = target_section.as_object_mut() {
                    merge_section(section, source_section, target_section, &mut notes);
                }
            }
            _ => notes.push(MergeNote::SectionSkipped {
                section: section.clone(),
            }),
        }
    }

    notes
}

fn merge_section(
    section: &str,
    source: &Map<String, Value>,
    target: &mut Map<String, Value>,
    notes: &mut Vec<MergeNote>,
) {
    for key in ARRAY_KEYS {
        let Some(target_value) = target.get_mut(key) else {
            continue;
        };

        let source_items = string_set(source.get(key));
        let target_items = string_set(Some(target_value));

        for element in target_items.difference(&source_items) {
            notes.push(MergeNote::TargetOnly {
                section: section.to_string(),
                key: key.to_string(),
                element: element.clone(),
            });
        }

        let mut merged: Vec<String> = target_items.union(&source_items).cloned().collect();
        merged.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        *target_value = Value::Array(merged.into_iter().map(Value::String).collect());
    }
}

fn string_set(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Read a JSON file.
pub fn load_json(path: &Path) -> Result<Value, LintError> {
    let content = std::fs::read_to_string(path).map_err(|source| LintError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LintError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render JSON with four-space indentation, leaving non-ASCII text unescaped.
pub fn to_pretty_json(value: &Value) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write `value` to `path` with [`to_pretty_json`].
pub fn save_json(path: &Path, value: &Value) -> Result<(), LintError> {
    let write_error = |source: std::io::Error| LintError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };
    let json = to_pretty_json(value).map_err(|e| write_error(e.into()))?;
    std::fs::write(path, json).map_err(write_error)
}
