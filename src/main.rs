use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use xliff_l10n::lint::{self, LintConfig};
use xliff_l10n::merge::{self, MatchPolicy, MergeOptions};
use xliff_l10n::reference;

#[derive(Debug, Parser)]
#[command(name = "xliff-l10n", version, about = "Maintain XLIFF localization catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate locale catalogs from the reference, keeping matching translations
    Update {
        /// Reference locale folder
        #[arg(long = "reference")]
        reference_locale: String,

        /// Folder including subfolders for all locales
        #[arg(long = "path")]
        base_folder: PathBuf,

        /// Which attributes must match for a translation to be kept
        #[arg(long = "type", value_enum, default_value_t = MatchPolicy::Standard)]
        policy: MatchPolicy,

        /// Print the merge report as JSON
        #[arg(long)]
        json: bool,

        /// Locales to process (default: every locale folder)
        locales: Vec<String>,
    },

    /// Check reference strings
    Lint {
        /// Folder with the reference catalogs
        #[arg(long)]
        path: PathBuf,

        /// JSON configuration of the checks
        #[arg(long)]
        config: PathBuf,
    },

    /// Copy source text into targets of the reference catalogs
    TranslateReference {
        /// Folder with the reference catalogs
        #[arg(long)]
        path: PathBuf,
    },

    /// Rewrite `original` attributes from en.lproj to en-US.lproj
    RewriteOriginal {
        /// Folder with the locale folders
        #[arg(long)]
        path: PathBuf,
    },

    /// Merge exclusions and brand names of one linter config into another
    MergeConfig {
        #[arg(long)]
        source: PathBuf,

        #[arg(long)]
        target: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file (ignored in CI)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xliff_l10n=info".parse()?),
        )
        .init();

    // Parse command line and run the subcommand
    match Cli::parse().command {
        Command::Update {
            reference_locale,
            base_folder,
            policy,
            json,
            locales,
        } => update(
            MergeOptions {
                reference_locale,
                base_folder,
                locales,
                policy,
            },
            json,
        ),
        Command::Lint { path, config } => run_lint(&path, &config),
        Command::TranslateReference { path } => {
            let updated = reference::translate_reference(&path)?;
            info!("{} reference files updated", updated.len());
            Ok(())
        }
        Command::RewriteOriginal { path } => {
            let updated = reference::rewrite_original_attribute(&path)?;
            info!("{} files updated", updated.len());
            Ok(())
        }
        Command::MergeConfig { source, target } => merge_config(&source, &target),
    }
}

fn update(options: MergeOptions, json: bool) -> Result<()> {
    let report = merge::update_locales(&options)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize merge report")?;
        println!("{}", rendered);
    }

    for skipped in &report.skipped_files {
        warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    info!(
        "{} translations carried forward, {} untranslated ({:.1}% coverage)",
        report.totals.carried,
        report.totals.untranslated,
        report.totals.coverage()
    );
    Ok(())
}

fn run_lint(path: &Path, config: &Path) -> Result<()> {
    let config = LintConfig::load(config)?;
    let report = lint::lint_tree(path, &config)?;

    if report.is_clean() {
        println!("No issues found.");
        return Ok(());
    }

    println!("{}", report.render());
    anyhow::bail!("{} issues found in reference strings", report.errors.len())
}

fn merge_config(source: &Path, target: &Path) -> Result<()> {
    let source_data = lint::load_json(source)?;
    let mut target_data = lint::load_json(target)?;

    for note in lint::merge_configs(&source_data, &mut target_data) {
        println!("{}", note);
    }

    lint::save_json(target, &target_data)
        .with_context(|| format!("Failed to update {}", target.display()))?;
    println!("Merged data written to {}", target.display());
    Ok(())
}
