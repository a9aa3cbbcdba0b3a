//! Field probes shared by the normalizer and the lookup matcher.
//!
//! Each probe is total: it takes whatever the upstream sent (possibly
//! nothing) and returns a canonical scalar or `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// `…/123` or `…:123` at the end of an id, as in `gid://shopify/Product/123`.
static TRAILING_NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/:](\d+)$").expect("valid trailing id regex"));

/// `Product/123` or `Product:123` anywhere in an id.
static PRODUCT_SEGMENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Product[/:](\d+)").expect("valid product id regex"));

/// Image URL locations, highest priority first.
const IMAGE_POINTERS: [&str; 5] = [
    "/images/edges/0/node/url",
    "/imageGroups/0/images/0/link",
    "/image",
    "/imageUrl",
    "/image_url",
];

/// Alt text attached to the first image edge of a GraphQL-shaped record.
pub const EDGE_ALT_TEXT_POINTER: &str = "/images/edges/0/node/altText";

/// Returns the digits after the last `/` or `:` when the id ends in them.
#[must_use]
pub fn trailing_numeric_id(raw: &str) -> Option<&str> {
    TRAILING_NUMERIC_ID
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Canonical id for a raw `id` value.
///
/// Global ids collapse to their numeric suffix, other strings pass through,
/// numbers are rendered as their JSON text. Absent, `null`, and container
/// values produce an empty string.
#[must_use]
pub fn extract_id(raw: Option<&Value>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let Value::String(s) = raw else {
        return scalar_to_string(raw).unwrap_or_default();
    };

    if let Some(digits) = trailing_numeric_id(s) {
        return digits.to_string();
    }
    if let Some(digits) = PRODUCT_SEGMENT_ID
        .captures(s)
        .and_then(|caps| caps.get(1))
    {
        return digits.as_str().to_string();
    }
    s.clone()
}

/// Coerces a price-like value to a number.
///
/// Handles `19.99`, `"19.99"`, and `{"amount": "19.99"}` (recursively, so a
/// GraphQL `minVariantPrice` object works directly). Strings must parse in
/// full as a finite number; `"abc"`, `"12abc"`, and `"NaN"` all yield `None`.
#[must_use]
pub fn normalize_price(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        Value::Object(obj) => normalize_price(obj.get("amount")),
        _ => None,
    }
}

/// First image URL found in the fixed priority order: GraphQL image edge,
/// REST image group, then the direct `image` / `imageUrl` / `image_url`
/// fields.
#[must_use]
pub fn extract_image_url(record: &Value) -> Option<String> {
    IMAGE_POINTERS
        .iter()
        .find_map(|pointer| non_empty_str(record.pointer(pointer)))
        .map(str::to_string)
}

/// The value as a `&str` if it is a non-empty string.
#[must_use]
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Strings, numbers, and booleans rendered as text; `None` for `null`,
/// arrays, and objects.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
