//! Single-product lookup by backend and id.
//!
//! Neither backend exposes a single-product endpoint, so a lookup fetches the
//! backend's full list once and searches it. One attempt, no cache.

use serde_json::Value;
use storefront_core::{AltTextPrecedence, NormalizedProduct, Source};

use crate::client::CatalogClient;
use crate::error::LookupError;
use crate::extract::{scalar_to_string, trailing_numeric_id};
use crate::normalize::{normalize_product, unwrap_envelope, NormalizeOptions};

/// Per-request inputs to [`lookup_product`].
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    /// Forwarded as `x-request-id` on the list fetch.
    pub request_id: Option<String>,
    pub alt_precedence: AltTextPrecedence,
}

/// Finds one product by `id` in a backend's list and normalizes it.
///
/// The result is stamped with the backend name and a non-empty id (the
/// requested id when the record's own id normalizes to nothing).
///
/// # Errors
///
/// - [`LookupError::InvalidSource`]: `source` is not a known backend; no
///   request is made.
/// - [`LookupError::Upstream`]: the list fetch returned a non-2xx status.
/// - [`LookupError::NotFound`]: no record matched.
/// - [`LookupError::Internal`]: transport failure or undecodable body.
pub async fn lookup_product(
    client: &CatalogClient,
    source: &str,
    id: &str,
    ctx: &LookupContext,
) -> Result<NormalizedProduct, LookupError> {
    let backend = source
        .parse::<Source>()
        .map_err(|_| LookupError::InvalidSource(source.to_owned()))?;

    let records = client
        .fetch_source_products(backend, ctx.request_id.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(source = %backend, error = %e, "product list fetch failed");
            LookupError::from_catalog(backend, e)
        })?;

    let record = find_product(backend, &records, id).ok_or_else(|| LookupError::NotFound {
        id: id.to_owned(),
        backend,
    })?;

    let options =
        NormalizeOptions::for_source(backend).with_alt_precedence(ctx.alt_precedence);
    let mut product = normalize_product(record, &options);

    product.source = Some(backend.as_str().to_owned());
    if product.id.is_empty() {
        id.clone_into(&mut product.id);
    }

    Ok(product)
}

/// Locates the record for `id` among raw list entries.
///
/// Exact id matches are tried across the whole list before the backend's
/// fallback rule: the numeric suffix of a global id for Shopify, the `sku`
/// for Salesforce. Returns the unwrapped record.
#[must_use]
pub fn find_product<'a>(backend: Source, records: &'a [Value], id: &str) -> Option<&'a Value> {
    let candidates: Vec<&Value> = records.iter().map(unwrap_envelope).collect();

    let exact = candidates
        .iter()
        .copied()
        .find(|record| raw_field(record, "id").as_deref() == Some(id));
    if exact.is_some() {
        return exact;
    }

    match backend {
        Source::Shopify => candidates.into_iter().find(|record| {
            raw_field(record, "id")
                .as_deref()
                .and_then(trailing_numeric_id)
                == Some(id)
        }),
        Source::Salesforce => candidates
            .into_iter()
            .find(|record| raw_field(record, "sku").as_deref() == Some(id)),
    }
}

fn raw_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(scalar_to_string)
}
