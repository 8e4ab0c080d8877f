//! Locale registry: single source of truth for locale code remapping.
//!
//! Some locale folders were named before the public locale tag settled, and
//! the iOS project and Pontoon disagree on a handful of codes. This registry
//! holds both tables. It uses a singleton pattern with `OnceLock` to ensure
//! thread-safe initialization and access.

use std::sync::OnceLock;

/// A single remapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleMapping {
    /// Code as it appears on the left side (folder name or repository code)
    pub from: &'static str,

    /// Code it maps to
    pub to: &'static str,
}

/// Global locale registry singleton.
#[derive(Debug)]
pub struct LocaleRegistry {
    /// Locale folder -> code written to `target-language`
    folder_to_catalog: Vec<LocaleMapping>,

    /// iOS repository code -> Pontoon code
    repository_to_backend: Vec<LocaleMapping>,

    /// Repository locales that are never compared against Pontoon
    ignored_repository_locales: Vec<&'static str>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            folder_to_catalog: folder_mappings(),
            repository_to_backend: repository_mappings(),
            ignored_repository_locales: vec!["en", "en-US"],
        })
    }

    /// Code to write in `target-language` for a locale folder.
    ///
    /// Applies the exception table first, then normalizes underscores to
    /// hyphens (e.g. `en_GB` => `en-GB`).
    pub fn catalog_code(&self, folder: &str) -> String {
        lookup(&self.folder_to_catalog, folder)
            .unwrap_or(folder)
            .replace('_', "-")
    }

    /// Pontoon code for a locale code used in the iOS repository.
    pub fn backend_code<'a>(&self, repository_code: &'a str) -> &'a str {
        match lookup(&self.repository_to_backend, repository_code) {
            Some(code) => code,
            None => repository_code,
        }
    }

    /// Whether a repository locale is excluded from backend comparisons.
    pub fn is_ignored_repository_locale(&self, code: &str) -> bool {
        self.ignored_repository_locales.contains(&code)
    }

    /// All folder remappings.
    pub fn folder_mappings(&self) -> &[LocaleMapping] {
        &self.folder_to_catalog
    }

    /// All repository remappings.
    pub fn repository_mappings(&self) -> &[LocaleMapping] {
        &self.repository_to_backend
    }
}

fn lookup(table: &[LocaleMapping], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|mapping| mapping.from == code)
        .map(|mapping| mapping.to)
}

/// Locale folders whose name differs from the public locale tag.
fn folder_mappings() -> Vec<LocaleMapping> {
    vec![
        LocaleMapping { from: "ga_IE", to: "ga" },
        LocaleMapping { from: "nb_NO", to: "nb" },
        LocaleMapping { from: "nn_NO", to: "nn" },
        LocaleMapping { from: "sat", to: "sat-Olck" },
        LocaleMapping { from: "sv_SE", to: "sv" },
        LocaleMapping { from: "templates", to: "en" },
        LocaleMapping { from: "tl", to: "fil" },
    ]
}

/// iOS locale codes that Pontoon knows under a different code.
fn repository_mappings() -> Vec<LocaleMapping> {
    vec![
        LocaleMapping { from: "fil", to: "tl" },
        LocaleMapping { from: "ga", to: "ga-IE" },
        LocaleMapping { from: "nb", to: "nb-NO" },
        LocaleMapping { from: "nn", to: "nn-NO" },
        LocaleMapping { from: "sat-Olck", to: "sat" },
        LocaleMapping { from: "sv", to: "sv-SE" },
        LocaleMapping { from: "tmz", to: "zgh" },
    ]
}
