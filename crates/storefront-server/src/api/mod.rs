mod fixtures;
pub(crate) mod products;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use storefront_catalog::CatalogClient;
use storefront_core::{AppConfig, PROCESSED_HEADER};
use tower::{Layer, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::interceptor::intercept;
use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: CatalogClient,
}

/// Error response rendered as `{"error": "..."}` with the carried status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// `?source=<name>` on list routes. Left as a string so unknown names can
/// be ignored or rejected per route.
#[derive(Debug, Deserialize)]
pub(crate) struct SourceQuery {
    pub source: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(PROCESSED_HEADER),
        ])
}

fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(fixtures::example_products))
        .route("/api/shopify", get(fixtures::shopify_products))
        .route("/api/salesforce", get(fixtures::salesforce_products))
        .route("/api/{source}/{id}", get(products::get_product))
        .route("/products", get(products::list_products))
        .fallback(not_found)
        .with_state(state)
}

/// Builds the full application.
///
/// The interceptor wraps the routed service rather than sitting on the
/// routes as a layer, so a vanity rewrite of the URI is seen by routing.
pub fn build_app(state: AppState) -> Router {
    let intercepted =
        axum::middleware::from_fn_with_state(state.clone(), intercept).layer(routes(state));

    Router::new().fallback_service(intercepted).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors())
            .layer(axum::middleware::from_fn(request_id)),
    )
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}
