//! Carry-forward merger.
//!
//! Regenerates every locale catalog from the reference catalog, reusing the
//! translations whose key (see [`MatchPolicy`]) still matches.
//!
//! # Architecture
//!
//! - `policy`: Match policies and translation key derivation
//! - `stats`: Per-file counters and the run report

mod policy;
mod stats;

pub use policy::{source_digest, MatchPolicy, TranslationKey};
pub use stats::{MergeReport, MergeStats, SkippedFile};

use crate::files;
use crate::i18n::LocaleRegistry;
use crate::xliff::{Document, XliffError};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Translations of one locale catalog, indexed by key.
pub type TranslationMap = HashMap<TranslationKey, String>;

/// Failures that abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No reference file found in {path}")]
    NoReferenceFiles { path: PathBuf },

    #[error("Can't parse reference file {path}: {source}")]
    UnparsableReference {
        path: PathBuf,
        #[source]
        source: XliffError,
    },

    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(XliffError),

    #[error("No files updated.")]
    NothingUpdated,
}

/// Parameters of a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Reference locale folder name (e.g. `en-US`)
    pub reference_locale: String,

    /// Folder containing one subfolder per locale
    pub base_folder: PathBuf,

    /// Locales to update; empty means every locale folder except the reference
    pub locales: Vec<String>,

    pub policy: MatchPolicy,
}

/// Index the existing translations of a locale catalog.
///
/// Units without a `<target>` are skipped. When two units share a key, the
/// later one wins.
pub fn collect_translations(doc: &Document, policy: MatchPolicy) -> TranslationMap {
    doc.units()
        .into_iter()
        .filter_map(|unit| unit.target().map(|target| (policy.key(&unit), target)))
        .collect()
}

/// Build a locale catalog from a clone of `reference`.
///
/// Every unit gets `xml:space="preserve"`; units with a matching key get the
/// stored translation, all others lose any `<target>`. Every file group's
/// `target-language` is set to `locale_code`.
pub fn carry_forward(
    reference: &Document,
    translations: &TranslationMap,
    policy: MatchPolicy,
    locale_code: &str,
) -> (Document, MergeStats) {
    let mut doc = reference.clone();
    let mut stats = MergeStats::default();

    doc.for_each_unit_mut(|mut unit| {
        unit.preserve_space();
        let key = policy.key(&unit.view());
        match translations.get(&key) {
            Some(translation) => {
                unit.set_target(translation);
                stats.carried += 1;
            }
            None => {
                stats.targets_dropped += unit.remove_targets();
                stats.untranslated += 1;
            }
        }
    });

    doc.for_each_file_group_mut(|file| file.set_attr("target-language", locale_code));

    (doc, stats)
}

/// Update every locale catalog that has a counterpart in the reference locale.
///
/// All reference files are parsed before anything is written, so an
/// unparsable reference aborts the run without touching any locale. A locale
/// file that fails to parse is skipped with a warning. A run that updates no
/// file at all is an error.
pub fn update_locales(options: &MergeOptions) -> Result<MergeReport, MergeError> {
    let reference_path = options.base_folder.join(&options.reference_locale);
    if !reference_path.is_dir() {
        return Err(MergeError::NoReferenceFiles {
            path: reference_path,
        });
    }

    let reference_files =
        files::find_relative_catalogs(&reference_path).map_err(|source| MergeError::Io {
            path: reference_path.clone(),
            source,
        })?;
    if reference_files.is_empty() {
        return Err(MergeError::NoReferenceFiles {
            path: reference_path,
        });
    }

    let mut references = Vec::with_capacity(reference_files.len());
    for relative in reference_files {
        let path = reference_path.join(&relative);
        let doc = Document::open(&path)
            .map_err(|source| MergeError::UnparsableReference { path, source })?;
        references.push((relative, doc));
    }

    let locales = if options.locales.is_empty() {
        files::locale_folders(&options.base_folder)
            .map_err(|source| MergeError::Io {
                path: options.base_folder.clone(),
                source,
            })?
            .into_iter()
            .filter(|locale| *locale != options.reference_locale)
            .collect()
    } else {
        options.locales.clone()
    };

    info!(
        "Updating {} locales from {} reference files (policy: {})",
        locales.len(),
        references.len(),
        options.policy
    );

    let registry = LocaleRegistry::get();
    let mut report = MergeReport::default();

    for (relative, reference) in &references {
        for locale in &locales {
            let l10n_file = options.base_folder.join(locale).join(relative);
            if !l10n_file.is_file() {
                continue;
            }

            info!("Updating {}", l10n_file.display());

            let existing = match Document::open(&l10n_file) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Can't parse {}: {}", l10n_file.display(), e);
                    report.record_skip(l10n_file, e.to_string());
                    continue;
                }
            };

            let translations = collect_translations(&existing, options.policy);
            let locale_code = registry.catalog_code(locale);
            let (updated, stats) =
                carry_forward(reference, &translations, options.policy, &locale_code);

            updated.save(&l10n_file).map_err(MergeError::Write)?;

            debug!(
                "{}: {} carried, {} untranslated, {} targets dropped ({:.1}% coverage)",
                l10n_file.display(),
                stats.carried,
                stats.untranslated,
                stats.targets_dropped,
                stats.coverage()
            );
            report.record_update(l10n_file, stats);
        }
    }

    if report.updated_count() == 0 {
        return Err(MergeError::NothingUpdated);
    }

    info!("{} updated files.", report.updated_count());
    Ok(report)
}
