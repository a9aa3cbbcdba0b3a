//! Mock backend routes serving product lists from JSON fixture files.

use std::path::Path;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use storefront_catalog::extract::{non_empty_str, EDGE_ALT_TEXT_POINTER};
use storefront_catalog::normalize::into_product_records;
use storefront_core::products::DEFAULT_ALT_TEXT;
use storefront_core::Source;

use super::{ApiError, AppState, SourceQuery};

const EXAMPLE_PRODUCTS_FILE: &str = "example_products.json";
const SHOPIFY_PRODUCTS_FILE: &str = "shopify_products.json";
const SALESFORCE_PRODUCTS_FILE: &str = "salesforce_products.json";

/// `GET /api/products`: the example list, or one backend's list when
/// `?source=` names a known backend. Unknown values are ignored.
pub(super) async fn example_products(
    State(state): State<AppState>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<Value>, ApiError> {
    let dir = &state.config.fixtures_dir;
    let products = match query.source.as_deref().map(str::parse::<Source>) {
        Some(Ok(Source::Shopify)) => shopify_list(dir).await?,
        Some(Ok(Source::Salesforce)) => fixture_list(dir, SALESFORCE_PRODUCTS_FILE).await?,
        Some(Err(_)) | None => fixture_list(dir, EXAMPLE_PRODUCTS_FILE).await?,
    };
    Ok(Json(json!({ "products": products })))
}

/// `GET /api/shopify`
pub(super) async fn shopify_products(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let products = shopify_list(&state.config.fixtures_dir).await?;
    Ok(Json(json!({ "products": products })))
}

/// `GET /api/salesforce`
pub(super) async fn salesforce_products(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let products = fixture_list(&state.config.fixtures_dir, SALESFORCE_PRODUCTS_FILE).await?;
    Ok(Json(json!({ "products": products })))
}

async fn shopify_list(dir: &Path) -> Result<Vec<Value>, ApiError> {
    let mut products = fixture_list(dir, SHOPIFY_PRODUCTS_FILE).await?;
    products.iter_mut().for_each(stamp_alt);
    Ok(products)
}

async fn fixture_list(dir: &Path, file: &str) -> Result<Vec<Value>, ApiError> {
    let path = dir.join(file);

    let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read product fixture");
        ApiError::internal()
    })?;

    let data: Value = serde_json::from_str(&contents).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "product fixture is not valid JSON");
        ApiError::internal()
    })?;

    Ok(into_product_records(data))
}

/// Sets `alt` from the first image edge's `altText`, else the title, else
/// the default alt text.
fn stamp_alt(record: &mut Value) {
    let alt = non_empty_str(record.pointer(EDGE_ALT_TEXT_POINTER))
        .or_else(|| non_empty_str(record.get("title")))
        .unwrap_or(DEFAULT_ALT_TEXT)
        .to_string();

    if let Value::Object(fields) = record {
        fields.insert("alt".to_string(), Value::String(alt));
    }
}
