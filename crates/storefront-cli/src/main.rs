mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_core::{AltTextPrecedence, Source};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront catalog normalization tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a product list JSON file and print `{"products": [...]}`
    Normalize {
        /// Path to a `{"products": [...]}` or bare-array JSON file
        file: PathBuf,
        /// Backend the records come from
        #[arg(long)]
        source: Option<Source>,
        /// Guess the backend from each record's shape when not given
        #[arg(long)]
        infer_source: bool,
        /// Which alt text wins: name-first or image-first
        #[arg(long, default_value_t = AltTextPrecedence::NameFirst)]
        alt_precedence: AltTextPrecedence,
    },
    /// Look up one product through the configured catalog API
    Lookup {
        /// Backend name (shopify or salesforce)
        source: String,
        /// Product id, global id, or sku
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Normalize {
            file,
            source,
            infer_source,
            alt_precedence,
        } => {
            let options = storefront_catalog::NormalizeOptions {
                source,
                infer_source,
                alt_precedence,
            };
            commands::run_normalize(&file, &options).await?;
        }
        Commands::Lookup { source, id } => {
            let config = storefront_core::load_app_config()?;
            commands::run_lookup(&config, &source, &id).await?;
        }
    }

    Ok(())
}
