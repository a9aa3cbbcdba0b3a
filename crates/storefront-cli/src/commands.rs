//! Command handlers for the CLI, called from `main` after argument parsing.

use std::path::Path;

use serde_json::{json, Value};
use storefront_catalog::{
    lookup_product, normalize_products, CatalogClient, LookupContext, NormalizeOptions,
};
use storefront_core::{AppConfig, ProductList};

/// Reads a product list file and prints its normalized form.
pub(crate) async fn run_normalize(file: &Path, options: &NormalizeOptions) -> anyhow::Result<()> {
    let list = normalize_file(file, options).await?;
    tracing::info!(file = %file.display(), count = list.products.len(), "normalized products");
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

pub(crate) async fn normalize_file(
    file: &Path,
    options: &NormalizeOptions,
) -> anyhow::Result<ProductList> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let data: Value = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", file.display()))?;
    Ok(normalize_products(&data, options))
}

/// Runs one product lookup against `config.api_url` and prints
/// `{"product": ...}`. A failed lookup prints `{"error", "status"}` to stderr
/// and returns an error so the process exits non-zero.
pub(crate) async fn run_lookup(config: &AppConfig, source: &str, id: &str) -> anyhow::Result<()> {
    let client = CatalogClient::new(
        &config.api_url,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;
    let ctx = LookupContext {
        request_id: None,
        alt_precedence: config.alt_precedence,
    };

    match lookup_product(&client, source, id, &ctx).await {
        Ok(product) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "product": product }))?);
            Ok(())
        }
        Err(e) => {
            let status = e.status_code();
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({ "error": e.to_string(), "status": status }))?
            );
            anyhow::bail!("lookup failed with status {status}")
        }
    }
}
