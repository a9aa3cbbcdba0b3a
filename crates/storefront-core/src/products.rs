use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback name for a record that was absent, `null`, or not an object.
pub const MISSING_PRODUCT_NAME: &str = "Unknown Product";

/// Fallback name for a record with neither `name` nor `title`.
pub const UNNAMED_PRODUCT_NAME: &str = "Unnamed Product";

/// Last-resort alt text; `alt` is never empty.
pub const DEFAULT_ALT_TEXT: &str = "Product image";

/// A product from either backend, reduced to the one shape the storefront
/// renders.
///
/// Fields the normalizer does not recognise are carried in [`Self::extra`]
/// and flattened back into the JSON object, so an upstream record keeps
/// e.g. its `handle` or `priceRange` alongside the canonical fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    /// Numeric suffix of a global id, or the raw id as a string. Empty when
    /// the upstream record had no id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub alt: String,
    #[serde(default)]
    pub description: String,
    /// Backend name (`"shopify"`, `"salesforce"`), or `"unknown"` when it was
    /// inferred and the shape matched neither.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedProduct {
    /// JSON keys owned by the canonical fields above. The normalizer strips
    /// these from [`Self::extra`] so canonical values always win.
    pub const CANONICAL_FIELDS: [&'static str; 9] = [
        "id",
        "sku",
        "name",
        "price",
        "originalPrice",
        "image",
        "alt",
        "description",
        "source",
    ];

    /// The record produced for an absent or non-object upstream entry.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            id: String::new(),
            sku: None,
            name: MISSING_PRODUCT_NAME.to_string(),
            price: None,
            original_price: None,
            image: None,
            alt: DEFAULT_ALT_TEXT.to_string(),
            description: String::new(),
            source: None,
            extra: Map::new(),
        }
    }
}

/// Canonical list payload: `{"products": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<NormalizedProduct>,
}
