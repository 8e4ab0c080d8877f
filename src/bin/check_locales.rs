use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use xliff_l10n::config::Config;
use xliff_l10n::remote::{self, Product};

/// Check if Pontoon locales are missing in the product repository.
#[derive(Debug, Parser)]
#[command(name = "check-locales", version)]
struct Args {
    /// Product code
    #[arg(long, value_enum)]
    product: Product,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in CI)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("check_locales=info".parse()?)
                .add_directive("xliff_l10n=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let product = args.product;

    // Load configuration from environment
    let config = Config::from_env()?;
    let (pontoon, github) = remote::clients(&config).context("Failed to build HTTP client")?;

    // Step 1: Fetch active locales from Pontoon
    let pontoon_locales = pontoon.project_locales(product.pontoon_slug()).await?;

    // Step 2: List locale folders in the repository
    let github_locales = github
        .locale_folders(product.github_repo(), product.github_path())
        .await?;
    info!(
        "{} locales in Pontoon, {} in the repository",
        pontoon_locales.len(),
        github_locales.len()
    );

    // Step 3: Report locales without a folder
    let missing = remote::missing_locales(&pontoon_locales, &github_locales);
    if !missing.is_empty() {
        anyhow::bail!(
            "{}\nMissing locales in repository: {}",
            product.name(),
            missing.join(", ")
        );
    }

    println!("{}\nNo missing locales", product.name());
    Ok(())
}
