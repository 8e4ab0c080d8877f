//! Reference string linter.
//!
//! Scans every reference catalog and reports strings that would be hard to
//! translate.
//!
//! # Architecture
//!
//! - `config`: JSON configuration of the checks
//! - `validator`: The checks themselves
//! - `config_merge`: Merging one linter configuration into another

mod config;
mod config_merge;
mod validator;

pub use config::{CheckConfig, LintConfig};
pub use config_merge::{load_json, merge_configs, save_json, to_pretty_json, MergeNote};
pub use validator::StringValidator;

use crate::files;
use crate::xliff::Document;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Linter failures (not findings; those go into [`LintReport`]).
#[derive(Debug, Error)]
pub enum LintError {
    #[error("Error loading config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error writing config {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No XLIFF files found in {path}")]
    NoCatalogs { path: PathBuf },

    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Findings of a lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    /// One formatted message per finding
    pub errors: Vec<String>,
    pub files_checked: usize,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable listing: a `Source errors (N)` header, then each entry indented.
    pub fn render(&self) -> String {
        let mut out = format!("Source errors ({})", self.errors.len());
        for error in &self.errors {
            let _ = write!(out, "\n\n  {}", error);
        }
        out
    }
}

/// Lint every catalog below `root`.
///
/// String ids are qualified with the catalog path relative to `root`, using
/// `/` as separator on every platform. A catalog that can't be parsed is
/// reported as a finding and the scan goes on.
pub fn lint_tree(root: &Path, config: &LintConfig) -> Result<LintReport, LintError> {
    let catalogs = files::find_catalogs(root).map_err(|source| LintError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if catalogs.is_empty() {
        return Err(LintError::NoCatalogs {
            path: root.to_path_buf(),
        });
    }

    let validator = StringValidator::new(config);
    let mut report = LintReport::default();

    for path in &catalogs {
        let relative = relative_id(root, path);
        debug!("Checking {}", relative);

        match Document::open(path) {
            Ok(doc) => validator.check_document(&doc, &relative, &mut report.errors),
            Err(e) => {
                warn!("Can't parse {}: {}", path.display(), e);
                report.errors.push(format!("Can't parse {}\n  {}", relative, e));
            }
        }
        report.files_checked += 1;
    }

    info!(
        "Checked {} files, {} issues found",
        report.files_checked,
        report.errors.len()
    );
    Ok(report)
}

fn relative_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn catalog(units: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="Client/en-US.lproj/Localizable.strings">
    <body>
{}
    </body>
  </file>
</xliff>
"#,
            units
        )
    }

    fn ellipsis_only() -> LintConfig {
        LintConfig {
            ellipsis: CheckConfig::enabled_with(Vec::<String>::new()),
            ..Default::default()
        }
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_render() {
        let report = LintReport {
            errors: vec!["first".to_string(), "second".to_string()],
            files_checked: 1,
        };
        assert_eq!(report.render(), "Source errors (2)\n\n  first\n\n  second");
        assert!(!report.is_clean());
        assert!(LintReport::default().is_clean());
    }

    // ==================== Tree Tests ====================

    #[test]
    fn test_lint_tree_nested_ids() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "en-US/sub/app.xliff",
            &catalog(r#"      <trans-unit id="more"><source>More...</source></trans-unit>"#),
        );

        let report = lint_tree(temp.path(), &ellipsis_only()).unwrap();
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("'...' found in en-US/sub/app.xliff:more"));
    }

    #[test]
    fn test_lint_tree_files_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "b.xliff",
            &catalog(r#"      <trans-unit id="x"><source>B...</source></trans-unit>"#),
        );
        write(
            temp.path(),
            "a.xliff",
            &catalog(r#"      <trans-unit id="x"><source>A...</source></trans-unit>"#),
        );

        let report = lint_tree(temp.path(), &ellipsis_only()).unwrap();
        assert!(report.errors[0].contains("a.xliff:x"));
        assert!(report.errors[1].contains("b.xliff:x"));
    }

    #[test]
    fn test_lint_tree_unparsable_file_reported() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "broken.xliff", "<xliff><file>");
        write(
            temp.path(),
            "good.xliff",
            &catalog(r#"      <trans-unit id="x"><source>Fine</source></trans-unit>"#),
        );

        let report = lint_tree(temp.path(), &ellipsis_only()).unwrap();
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Can't parse broken.xliff"));
    }

    #[test]
    fn test_lint_tree_without_catalogs() {
        let temp = TempDir::new().unwrap();
        let err = lint_tree(temp.path(), &ellipsis_only()).unwrap_err();
        assert!(matches!(err, LintError::NoCatalogs { .. }));
    }

    #[test]
    fn test_lint_tree_clean() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "app.xliff",
            &catalog(r#"      <trans-unit id="x"><source>More…</source></trans-unit>"#),
        );
        assert!(lint_tree(temp.path(), &ellipsis_only()).unwrap().is_clean());
    }
}
