//! Normalization from raw upstream product JSON to
//! [`storefront_core::NormalizedProduct`].
//!
//! Both backends are handled by the same probe chain per canonical field;
//! see [`crate::extract`] for the individual probes. Normalization is total:
//! malformed records degrade field by field and never fail the batch.

use serde_json::Value;
use storefront_core::products::{DEFAULT_ALT_TEXT, UNNAMED_PRODUCT_NAME};
use storefront_core::{AltTextPrecedence, NormalizedProduct, ProductList, Source};

use crate::extract::{
    extract_id, extract_image_url, non_empty_str, normalize_price, scalar_to_string,
    EDGE_ALT_TEXT_POINTER,
};

/// Rendered source name when inference matched neither backend.
pub const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Backend the records are known to come from. Takes precedence over
    /// inference but not over a `source` field already on the record.
    pub source: Option<Source>,
    /// Guess the backend from the record shape when neither the record nor
    /// the caller names one.
    pub infer_source: bool,
    pub alt_precedence: AltTextPrecedence,
}

impl NormalizeOptions {
    #[must_use]
    pub fn for_source(source: Source) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alt_precedence(mut self, alt_precedence: AltTextPrecedence) -> Self {
        self.alt_precedence = alt_precedence;
        self
    }

    #[must_use]
    pub fn with_inference(mut self, infer_source: bool) -> Self {
        self.infer_source = infer_source;
        self
    }
}

/// Normalizes every product in an upstream list payload.
///
/// Accepts `{"products": [...]}` or a bare array. Any other top-level shape
/// yields an empty list.
#[must_use]
pub fn normalize_products(data: &Value, options: &NormalizeOptions) -> ProductList {
    ProductList {
        products: product_records(data)
            .iter()
            .map(|record| normalize_product(record, options))
            .collect(),
    }
}

/// Normalizes one raw record.
#[must_use]
pub fn normalize_product(raw: &Value, options: &NormalizeOptions) -> NormalizedProduct {
    let record = unwrap_envelope(raw);
    let Some(fields) = record.as_object() else {
        return NormalizedProduct::missing();
    };

    let id = extract_id(fields.get("id"));

    let name = non_empty_str(fields.get("name"))
        .or_else(|| non_empty_str(fields.get("title")))
        .unwrap_or(UNNAMED_PRODUCT_NAME)
        .to_string();

    // A direct value that fails to parse falls through to the range.
    let price = normalize_price(fields.get("price"))
        .or_else(|| normalize_price(record.pointer("/priceRange/minVariantPrice")));
    let original_price = normalize_price(fields.get("originalPrice"))
        .or_else(|| normalize_price(record.pointer("/priceRange/maxVariantPrice")));

    let image = extract_image_url(record);
    let alt = resolve_alt(record, &name, options.alt_precedence);

    let record_source = non_empty_str(fields.get("source"));
    let inferred = (options.infer_source && record_source.is_none() && options.source.is_none())
        .then(|| infer_source(record));

    let effective_source = record_source
        .and_then(|s| s.parse::<Source>().ok())
        .or(options.source)
        .or(inferred.flatten());

    let source = record_source
        .map(str::to_string)
        .or_else(|| options.source.map(|s| s.as_str().to_string()))
        .or_else(|| {
            inferred.map(|guess| guess.map_or(UNKNOWN_SOURCE, Source::as_str).to_string())
        });

    let sku = fields
        .get("sku")
        .and_then(scalar_to_string)
        .filter(|s| !s.is_empty())
        .or_else(|| match effective_source {
            Some(Source::Shopify) => non_empty_str(fields.get("handle")).map(str::to_string),
            _ => None,
        })
        .or_else(|| (!id.is_empty()).then(|| id.clone()));

    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut extra = fields.clone();
    for key in NormalizedProduct::CANONICAL_FIELDS {
        extra.remove(key);
    }

    NormalizedProduct {
        id,
        sku,
        name,
        price,
        original_price,
        image,
        alt,
        description,
        source,
        extra,
    }
}

/// Best-effort guess of a record's backend from its shape.
///
/// A price range, image edges, or a `title` mean the GraphQL-shaped
/// backend; `name` together with `sku` means the REST-shaped one. Ambiguous
/// records can be misclassified, so callers that know the source should
/// pass it via [`NormalizeOptions::source`] instead.
#[must_use]
pub fn infer_source(record: &Value) -> Option<Source> {
    let has = |key: &str| record.get(key).is_some_and(|v| !v.is_null());

    if has("priceRange") || record.pointer("/images/edges").is_some() || has("title") {
        Some(Source::Shopify)
    } else if has("name") && has("sku") {
        Some(Source::Salesforce)
    } else {
        None
    }
}

/// Replaces a `{"data": {"product": {...}}}` envelope with the inner product.
#[must_use]
pub fn unwrap_envelope(record: &Value) -> &Value {
    match record.get("data") {
        Some(Value::Object(data)) => data.get("product").unwrap_or(record),
        _ => record,
    }
}

/// The record slice of a list payload, borrowed.
#[must_use]
pub fn product_records(data: &Value) -> &[Value] {
    match data {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => obj
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// The records of a list payload, taking ownership.
#[must_use]
pub fn into_product_records(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn resolve_alt(record: &Value, name: &str, precedence: AltTextPrecedence) -> String {
    let edge_alt = match precedence {
        AltTextPrecedence::ImageFirst => non_empty_str(record.pointer(EDGE_ALT_TEXT_POINTER)),
        AltTextPrecedence::NameFirst => None,
    };

    edge_alt
        .or_else(|| non_empty_str(record.get("alt")))
        .or_else(|| Some(name).filter(|n| !n.is_empty()))
        .unwrap_or(DEFAULT_ALT_TEXT)
        .to_string()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
