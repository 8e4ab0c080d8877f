//! Reference string validation.
//!
//! This module checks reference strings before they are exposed for
//! translation: placeables must be documented in the unit's note, and
//! strings must use typographic ellipsis and quotes and must not hard-code
//! brand names.

use crate::lint::LintConfig;
use crate::xliff::Document;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validator for reference strings.
#[derive(Debug, Clone, Copy)]
pub struct StringValidator<'a> {
    config: &'a LintConfig,
}

// Regex pattern for placeable extraction (cached for performance)
static PLACEABLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeable_regex() -> &'static Regex {
    PLACEABLE_REGEX.get_or_init(|| Regex::new(r"%(?:\d+\$@|@|d)").unwrap())
}

impl<'a> StringValidator<'a> {
    pub fn new(config: &'a LintConfig) -> Self {
        Self { config }
    }

    /// Run every enabled check on one string.
    ///
    /// # Arguments
    /// * `string_id` - Qualified id (`relative/path.xliff:unit-id`)
    /// * `source` - Reference text
    /// * `note` - Content of the unit's `<note>`, if any
    ///
    /// # Returns
    /// One message per violation, in check order.
    pub fn check_string(&self, string_id: &str, source: &str, note: Option<&str>) -> Vec<String> {
        let mut errors = Vec::new();
        self.check_placeables(string_id, source, note, &mut errors);
        self.check_ellipsis(string_id, source, &mut errors);
        self.check_quotes(string_id, source, &mut errors);
        self.check_brands(string_id, source, &mut errors);
        errors
    }

    /// Check every unit of a catalog, appending to `errors`.
    pub fn check_document(&self, doc: &Document, relative_path: &str, errors: &mut Vec<String>) {
        for unit in doc.units() {
            let Some(source) = unit.source() else {
                continue;
            };
            let string_id = format!("{}:{}", relative_path, unit.id().unwrap_or_default());
            let note = unit.note();
            errors.extend(self.check_string(&string_id, &source, note.as_deref()));
        }
    }

    /// Placeables must all appear verbatim in the note.
    fn check_placeables(
        &self,
        string_id: &str,
        source: &str,
        note: Option<&str>,
        errors: &mut Vec<String>,
    ) {
        if !self.config.placeables.enabled {
            return;
        }

        let placeables = Self::extract_placeables(source);
        if placeables.is_empty() {
            return;
        }

        match note.filter(|n| !n.is_empty()) {
            None => errors.push(format!(
                "Identified placeables in string {}: {}\n  The string doesn't have a comment.\n  Text: {:?}",
                string_id,
                placeables.join(", "),
                source
            )),
            // Exclusions only silence the coverage message
            Some(_) if self.config.placeables.exclusions.contains(string_id) => {}
            Some(note) => {
                let missing: Vec<&str> = placeables
                    .iter()
                    .map(String::as_str)
                    .filter(|placeable| !note.contains(placeable))
                    .collect();
                if !missing.is_empty() {
                    errors.push(format!(
                        "Identified placeables in string {}: {}\n  Comment does not include the following placeables: {}\n  Text: {:?}\n  Comment: {}",
                        string_id,
                        placeables.join(", "),
                        missing.join(", "),
                        source,
                        note
                    ));
                }
            }
        }
    }

    /// A single ellipsis character must be used instead of three dots.
    fn check_ellipsis(&self, string_id: &str, source: &str, errors: &mut Vec<String>) {
        if self.config.ellipsis.applies_to(string_id) && source.contains("...") {
            errors.push(format!("'...' found in {}\n  Text: {:?}", string_id, source));
        }
    }

    /// Straight quotes must be replaced by typographic ones.
    fn check_quotes(&self, string_id: &str, source: &str, errors: &mut Vec<String>) {
        if !self.config.quotes.applies_to(string_id) {
            return;
        }
        if source.contains('\'') {
            errors.push(format!(
                "' found in {} (should use ’)\n  Text: {:?}",
                string_id, source
            ));
        }
        if source.contains('"') {
            errors.push(format!(
                "\" found in {} (should use “”)\n  Text: {:?}",
                string_id, source
            ));
        }
    }

    /// Brand names must come from a run-time placeable.
    fn check_brands(&self, string_id: &str, source: &str, errors: &mut Vec<String>) {
        if !self.config.brands.applies_to(string_id) {
            return;
        }
        for brand in &self.config.brands.brand_names {
            if !brand.is_empty() && source.contains(brand.as_str()) {
                errors.push(format!(
                    "{} found in {} (should use a run-time placeable)\n  Text: {:?}",
                    brand, string_id, source
                ));
            }
        }
    }

    /// Distinct placeables in `text`, sorted.
    pub fn extract_placeables(text: &str) -> Vec<String> {
        placeable_regex()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
