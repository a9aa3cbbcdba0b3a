//! Request interceptor wrapping the whole router.
//!
//! Every request is classified once, in this order:
//!
//! 1. carries the processed marker: forwarded untouched;
//! 2. `/api/<source>/<id>`: answered from a product lookup;
//! 3. a catalog list path: re-fetched with the marker set, normalized, and
//!    answered directly, or forwarded untouched if the re-fetch is unusable;
//! 4. a vanity path: URI rewritten to the listing page and forwarded;
//! 5. anything else: forwarded untouched.

use std::borrow::Cow;

use axum::{
    extract::{Query, Request, State},
    http::{HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use storefront_catalog::{normalize_products, NormalizeOptions};
use storefront_core::{Source, PROCESSED_HEADER, PROCESSED_HEADER_VALUE};

use crate::api::products::lookup_response;
use crate::api::{AppState, SourceQuery};
use crate::middleware::RequestId;

const LIST_PREFIXES: [(&str, Option<Source>); 3] = [
    ("/api/products", None),
    ("/api/shopify", Some(Source::Shopify)),
    ("/api/salesforce", Some(Source::Salesforce)),
];

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Interception<'a> {
    /// Segments are percent-decoded, matching what the routed
    /// `/api/{source}/{id}` handler receives.
    Detail { source: Cow<'a, str>, id: Cow<'a, str> },
    List { source: Option<Source> },
    Vanity(Source),
    PassThrough,
}

/// Classifies a request path. The processed marker is checked separately.
pub(crate) fn classify(path: &str) -> Interception<'_> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if let ["api", source, id] = segments.as_slice() {
        let source = percent_decode_str(*source).decode_utf8_lossy();
        if source != "products" {
            return Interception::Detail {
                source,
                id: percent_decode_str(*id).decode_utf8_lossy(),
            };
        }
    }

    for (prefix, source) in LIST_PREFIXES {
        let sub_path = path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if sub_path {
            return Interception::List { source };
        }
    }

    match path {
        "/shopify" => Interception::Vanity(Source::Shopify),
        "/salesforce" => Interception::Vanity(Source::Salesforce),
        _ => Interception::PassThrough,
    }
}

pub async fn intercept(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.headers().contains_key(PROCESSED_HEADER) {
        return next.run(req).await;
    }

    let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
    let uri = req.uri().clone();

    match classify(uri.path()) {
        Interception::Detail { source, id } => {
            let mut response = lookup_response(&state, &source, &id, request_id).await;
            mark_processed(&mut response);
            response
        }
        Interception::List { source } => {
            let source = source.or_else(|| query_source(&uri));
            let path_and_query = uri
                .path_and_query()
                .map_or_else(|| uri.path(), |pq| pq.as_str());

            match normalized_list(&state, path_and_query, source, request_id.as_deref()).await {
                Some(response) => response,
                None => next.run(req).await,
            }
        }
        Interception::Vanity(source) => {
            let target = listing_target(uri.query(), source);
            match target.parse::<Uri>() {
                Ok(rewritten) => {
                    tracing::debug!(from = %uri, to = %rewritten, "vanity rewrite");
                    *req.uri_mut() = rewritten;
                }
                Err(e) => {
                    tracing::warn!(uri = %target, error = %e, "vanity rewrite produced an invalid URI");
                }
            }
            next.run(req).await
        }
        Interception::PassThrough => next.run(req).await,
    }
}

/// Re-fetches a list route and normalizes it. `None` means the caller should
/// forward the original request instead.
async fn normalized_list(
    state: &AppState,
    path_and_query: &str,
    source: Option<Source>,
    request_id: Option<&str>,
) -> Option<Response> {
    let upstream = match state.client.refetch(path_and_query, request_id).await {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::warn!(path = path_and_query, error = %e, "list re-fetch failed, passing through");
            return None;
        }
    };

    if !upstream.is_success() {
        tracing::warn!(path = path_and_query, status = upstream.status, "list re-fetch returned non-success, passing through");
        return None;
    }

    let data: Value = match serde_json::from_str(&upstream.body) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = path_and_query, error = %e, "list re-fetch body is not JSON, passing through");
            return None;
        }
    };

    let options = NormalizeOptions {
        source,
        infer_source: state.config.infer_source,
        alt_precedence: state.config.alt_precedence,
    };
    let list = normalize_products(&data, &options);
    tracing::debug!(path = path_and_query, count = list.products.len(), "normalized product list");

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
    let mut response = (status, Json(list)).into_response();
    mark_processed(&mut response);
    Some(response)
}

fn mark_processed(response: &mut Response) {
    response.headers_mut().insert(
        PROCESSED_HEADER,
        HeaderValue::from_static(PROCESSED_HEADER_VALUE),
    );
}

/// `?source=` parsed the same way the route handlers' `Query` extractor
/// parses it. Unknown or malformed values yield `None`.
fn query_source(uri: &Uri) -> Option<Source> {
    let Query(query) = Query::<SourceQuery>::try_from_uri(uri).ok()?;
    query.source?.parse().ok()
}

/// `/products?source=<name>`, keeping any other query parameters.
pub(crate) fn listing_target(query: Option<&str>, source: Source) -> String {
    let mut target = format!("/products?source={source}");
    for pair in query.unwrap_or_default().split('&') {
        let key = pair.split('=').next().unwrap_or_default();
        if pair.is_empty() || percent_decode_str(key).decode_utf8_lossy() == "source" {
            continue;
        }
        target.push('&');
        target.push_str(pair);
    }
    target
}

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod tests;
