//! Maintenance of reference catalogs.
//!
//! `translate_reference` fills the targets of the reference locale with the
//! source text. `rewrite_original_attribute` moves `original` attributes from
//! the `en.lproj` folder to `en-US.lproj` so existing translations keep
//! matching after the product changed its default locale.

use crate::files;
use crate::xliff::Document;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const TEMPLATES_FOLDER: &str = "templates";
const OLD_REFERENCE_FOLDER: &str = "en.lproj";
const NEW_REFERENCE_FOLDER: &str = "en-US.lproj";

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("File not found in {path}")]
    NoCatalogs { path: PathBuf },

    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Copy each unit's source into its target, for every catalog under `path`.
///
/// Returns the files rewritten. Files that fail to parse or write are logged
/// and skipped.
pub fn translate_reference(path: &Path) -> Result<Vec<PathBuf>, ReferenceError> {
    let catalogs = files::find_catalogs(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if catalogs.is_empty() {
        return Err(ReferenceError::NoCatalogs {
            path: path.to_path_buf(),
        });
    }

    let mut updated = Vec::new();
    for catalog in catalogs {
        let mut doc = match Document::open(&catalog) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Can't parse {}: {}", catalog.display(), e);
                continue;
            }
        };

        let mut copied = 0;
        doc.for_each_unit_mut(|mut unit| {
            if unit.copy_source_to_target() {
                copied += 1;
            }
        });

        if let Err(e) = doc.save(&catalog) {
            warn!("{}", e);
            continue;
        }
        info!("Updated {} ({} strings)", catalog.display(), copied);
        updated.push(catalog);
    }

    Ok(updated)
}

/// Point `original` attributes at `en-US.lproj` instead of `en.lproj`.
///
/// Looks at the `*.xliff` files directly inside every locale folder of
/// `locales_path`, except hidden folders and `templates`. Returns the files
/// rewritten; per-file failures are logged and skipped.
pub fn rewrite_original_attribute(locales_path: &Path) -> Result<Vec<PathBuf>, ReferenceError> {
    let locales = files::locale_folders(locales_path).map_err(|source| ReferenceError::Io {
        path: locales_path.to_path_buf(),
        source,
    })?;

    let mut updated = Vec::new();
    for locale in locales.iter().filter(|l| l.as_str() != TEMPLATES_FOLDER) {
        let folder = locales_path.join(locale);
        let catalogs = match files::catalogs_in_folder(&folder) {
            Ok(catalogs) => catalogs,
            Err(e) => {
                warn!("Error listing {}: {}", folder.display(), e);
                continue;
            }
        };

        for catalog in catalogs {
            match rewrite_file(&catalog) {
                Ok(()) => {
                    info!("Updated file: {}", catalog.display());
                    updated.push(catalog);
                }
                Err(e) => warn!("Error processing file {}: {}", catalog.display(), e),
            }
        }
    }

    Ok(updated)
}

fn rewrite_file(path: &Path) -> Result<(), crate::xliff::XliffError> {
    let mut doc = Document::open(path)?;
    doc.for_each_file_group_mut(|file| {
        if let Some(original) = file.attr("original") {
            let rewritten = original.replace(OLD_REFERENCE_FOLDER, NEW_REFERENCE_FOLDER);
            file.set_attr("original", rewritten);
        }
    });
    doc.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="Client/en.lproj/Localizable.strings" source-language="en">
    <body>
      <trans-unit id="Close">
        <source>Close</source>
      </trans-unit>
      <trans-unit id="Open">
        <source>Open</source>
        <target>Stale</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    // ==================== Translate Reference Tests ====================

    #[test]
    fn test_translate_reference() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "en-US/firefox-ios.xliff", CATALOG);

        let updated = translate_reference(&temp.path().join("en-US")).unwrap();
        assert_eq!(updated, vec![path.clone()]);

        let doc = Document::open(&path).unwrap();
        let targets: Vec<_> = doc.units().iter().map(|u| u.target()).collect();
        assert_eq!(
            targets,
            vec![Some("Close".to_string()), Some("Open".to_string())]
        );
    }

    #[test]
    fn test_translate_reference_skips_broken_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.xliff", "<xliff>");
        let good = write(temp.path(), "b.xliff", CATALOG);

        let updated = translate_reference(temp.path()).unwrap();
        assert_eq!(updated, vec![good]);
        assert_eq!(fs::read_to_string(temp.path().join("a.xliff")).unwrap(), "<xliff>");
    }

    #[test]
    fn test_translate_reference_without_files() {
        let temp = TempDir::new().unwrap();
        let err = translate_reference(temp.path()).unwrap_err();
        assert!(matches!(err, ReferenceError::NoCatalogs { .. }));
    }

    // ==================== Rewrite Original Tests ====================

    #[test]
    fn test_rewrite_original_attribute() {
        let temp = TempDir::new().unwrap();
        let fr = write(temp.path(), "fr/firefox-ios.xliff", CATALOG);
        let templates = write(temp.path(), "templates/firefox-ios.xliff", CATALOG);
        let hidden = write(temp.path(), ".git/firefox-ios.xliff", CATALOG);
        let nested = write(temp.path(), "de/nested/firefox-ios.xliff", CATALOG);

        let updated = rewrite_original_attribute(temp.path()).unwrap();
        assert_eq!(updated, vec![fr.clone()]);

        let doc = Document::open(&fr).unwrap();
        assert_eq!(
            doc.root().child("file").unwrap().attr("original"),
            Some("Client/en-US.lproj/Localizable.strings")
        );
        for untouched in [templates, hidden, nested] {
            assert_eq!(fs::read_to_string(untouched).unwrap(), CATALOG);
        }
    }

    #[test]
    fn test_rewrite_original_is_stable() {
        let temp = TempDir::new().unwrap();
        let fr = write(temp.path(), "fr/firefox-ios.xliff", CATALOG);

        rewrite_original_attribute(temp.path()).unwrap();
        let first = fs::read_to_string(&fr).unwrap();
        rewrite_original_attribute(temp.path()).unwrap();
        assert_eq!(fs::read_to_string(&fr).unwrap(), first);
        assert!(!first.contains("/en.lproj/"));
    }

    #[test]
    fn test_rewrite_original_skips_broken_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "fr/broken.xliff", "not xml <");
        let good = write(temp.path(), "fr/good.xliff", CATALOG);

        let updated = rewrite_original_attribute(temp.path()).unwrap();
        assert_eq!(updated, vec![good]);
    }
}
