//! Merge statistics.
//!
//! Counters for a single locale pass, summed into a run-level report.

use serde::Serialize;
use std::ops::AddAssign;
use std::path::PathBuf;

/// Counters for one (reference file, locale) pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Units whose translation was carried forward
    pub carried: usize,

    /// Units left untranslated
    pub untranslated: usize,

    /// `<target>` elements removed from the reference clone
    pub targets_dropped: usize,
}

impl MergeStats {
    /// Total number of units seen.
    pub fn units(&self) -> usize {
        self.carried + self.untranslated
    }

    /// Share of units carried forward, as a percentage (0-100).
    pub fn coverage(&self) -> f64 {
        let units = self.units();
        if units > 0 {
            (self.carried as f64 / units as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.carried += other.carried;
        self.untranslated += other.untranslated;
        self.targets_dropped += other.targets_dropped;
    }
}

/// A locale file that could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a whole merge run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// Locale files rewritten
    pub updated_files: Vec<PathBuf>,

    /// Locale files that failed to parse
    pub skipped_files: Vec<SkippedFile>,

    /// Counters summed over every updated file
    pub totals: MergeStats,
}

impl MergeReport {
    pub fn updated_count(&self) -> usize {
        self.updated_files.len()
    }

    pub(crate) fn record_update(&mut self, path: PathBuf, stats: MergeStats) {
        self.updated_files.push(path);
        self.totals += stats;
    }

    pub(crate) fn record_skip(&mut self, path: PathBuf, reason: String) {
        self.skipped_files.push(SkippedFile { path, reason });
    }
}
