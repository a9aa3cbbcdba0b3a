use axum::{
    extract::{Path, Query, State},
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use storefront_catalog::{
    lookup_product, normalize_products, CatalogError, LookupContext, NormalizeOptions,
};
use storefront_core::{NormalizedProduct, Source};

use crate::middleware::RequestId;

use super::{ApiError, AppState, SourceQuery};

#[derive(Debug, Serialize)]
struct ProductBody {
    product: NormalizedProduct,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductListing {
    source: Option<Source>,
    products: Vec<NormalizedProduct>,
}

/// `Cache-Control` for a successful detail lookup.
pub(crate) fn detail_cache_control(max_age_secs: u64) -> String {
    format!("public, max-age={max_age_secs}, stale-while-revalidate={max_age_secs}")
}

/// Runs a product lookup and renders it as `{"product": ...}` or
/// `{"error": ...}` with the lookup's status.
pub(crate) async fn lookup_response(
    state: &AppState,
    source: &str,
    id: &str,
    request_id: Option<String>,
) -> Response {
    let ctx = LookupContext {
        request_id,
        alt_precedence: state.config.alt_precedence,
    };

    match lookup_product(&state.client, source, id, &ctx).await {
        Ok(product) => {
            let mut response = Json(ProductBody { product }).into_response();
            if let Ok(value) =
                HeaderValue::from_str(&detail_cache_control(state.config.detail_cache_secs))
            {
                response.headers_mut().insert(CACHE_CONTROL, value);
            }
            response
        }
        Err(e) => {
            tracing::warn!(source, id, status = e.status_code(), error = %e, "product lookup failed");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ApiError::new(status, e.to_string()).into_response()
        }
    }
}

/// `GET /api/{source}/{id}`, reached when the interceptor lets the request
/// through.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((source, id)): Path<(String, String)>,
) -> Response {
    lookup_response(&state, &source, &id, Some(req_id.0)).await
}

/// `GET /products?source=`: the normalized listing behind the vanity paths.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<ProductListing>, ApiError> {
    let source = query
        .source
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<Source>)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let request_id = Some(req_id.0.as_str());
    let records = match source {
        Some(source) => state.client.fetch_source_products(source, request_id).await,
        None => state.client.fetch_products("/api/products", request_id).await,
    }
    .map_err(|e| listing_error(source, &e))?;

    let options = NormalizeOptions {
        source,
        infer_source: state.config.infer_source,
        alt_precedence: state.config.alt_precedence,
    };
    let list = normalize_products(&serde_json::Value::Array(records), &options);

    Ok(Json(ProductListing {
        source,
        products: list.products,
    }))
}

fn listing_error(source: Option<Source>, error: &CatalogError) -> ApiError {
    tracing::warn!(source = ?source, error = %error, "product listing fetch failed");
    match (error, source) {
        (CatalogError::UnexpectedStatus { status, .. }, Some(source)) => ApiError::new(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            format!("Failed to fetch data from source: {source}"),
        ),
        (CatalogError::UnexpectedStatus { status, .. }, None) => ApiError::new(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            "Failed to fetch product list",
        ),
        _ => ApiError::internal(),
    }
}
