use std::collections::HashMap;

use axum::http::{header::CACHE_CONTROL, StatusCode};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::api::test_support::{get, test_config, test_state};

fn no_headers() -> HashMap<&'static str, &'static str> {
    HashMap::new()
}

fn marker(response: &axum::http::Response<axum::body::Body>) -> Option<&str> {
    response
        .headers()
        .get(PROCESSED_HEADER)
        .and_then(|v| v.to_str().ok())
}

fn raw_shopify_list() -> serde_json::Value {
    json!({
        "products": [{
            "id": "gid://shopify/Product/8001",
            "title": "Canvas Tote",
            "handle": "canvas-tote",
            "priceRange": {
                "minVariantPrice": {"amount": "35.00", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "35.00", "currencyCode": "USD"}
            },
            "images": {"edges": [{"node": {"url": "https://cdn.example.com/tote.jpg", "altText": "Tote on a hook"}}]}
        }]
    })
}

fn raw_salesforce_list() -> serde_json::Value {
    json!({
        "products": [{
            "id": "SFCC-1",
            "name": "Rain Jacket",
            "sku": "RJ-001",
            "price": 120,
            "originalPrice": 150,
            "imageGroups": [{"images": [{"link": "https://cdn.example.com/jacket.jpg"}]}]
        }]
    })
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_detail_paths() {
    assert_eq!(
        classify("/api/shopify/123"),
        Interception::Detail {
            source: "shopify".into(),
            id: "123".into()
        }
    );
    assert_eq!(
        classify("/api/amazon/1"),
        Interception::Detail {
            source: "amazon".into(),
            id: "1".into()
        }
    );
}

#[test]
fn classify_decodes_detail_segments() {
    assert_eq!(
        classify("/api/shopify/gid%3A%2F%2Fshopify%2FProduct%2F8001"),
        Interception::Detail {
            source: "shopify".into(),
            id: "gid://shopify/Product/8001".into()
        }
    );
    assert_eq!(
        classify("/api/salesforce/RJ%20001"),
        Interception::Detail {
            source: "salesforce".into(),
            id: "RJ 001".into()
        }
    );
    assert_eq!(
        classify("/api/product%73/1"),
        Interception::List { source: None }
    );
}

#[test]
fn classify_products_sub_path_is_list_not_detail() {
    assert_eq!(
        classify("/api/products/123"),
        Interception::List { source: None }
    );
}

#[test]
fn classify_list_paths() {
    assert_eq!(classify("/api/products"), Interception::List { source: None });
    assert_eq!(
        classify("/api/shopify"),
        Interception::List {
            source: Some(Source::Shopify)
        }
    );
    assert_eq!(
        classify("/api/salesforce/a/b"),
        Interception::List {
            source: Some(Source::Salesforce)
        }
    );
}

#[test]
fn classify_requires_whole_segment_prefix() {
    assert_eq!(classify("/api/shopifyx"), Interception::PassThrough);
    assert_eq!(classify("/api/productsfeed"), Interception::PassThrough);
}

#[test]
fn classify_vanity_and_other_paths() {
    assert_eq!(classify("/shopify"), Interception::Vanity(Source::Shopify));
    assert_eq!(
        classify("/salesforce"),
        Interception::Vanity(Source::Salesforce)
    );
    assert_eq!(classify("/shopify/extra"), Interception::PassThrough);
    assert_eq!(classify("/health"), Interception::PassThrough);
    assert_eq!(classify("/"), Interception::PassThrough);
}

#[test]
fn listing_target_sets_source_and_keeps_other_params() {
    assert_eq!(
        listing_target(None, Source::Salesforce),
        "/products?source=salesforce"
    );
    assert_eq!(
        listing_target(Some("page=2&source=x"), Source::Shopify),
        "/products?source=shopify&page=2"
    );
}

#[test]
fn listing_target_drops_encoded_source_key() {
    assert_eq!(
        listing_target(Some("sourc%65=x&page=2"), Source::Salesforce),
        "/products?source=salesforce&page=2"
    );
}

#[test]
fn query_source_reads_known_sources_only() {
    let uri = |s: &str| s.parse::<Uri>().expect("uri");
    assert_eq!(
        query_source(&uri("/api/products?a=1&source=shopify")),
        Some(Source::Shopify)
    );
    assert_eq!(query_source(&uri("/api/products?source=amazon")), None);
    assert_eq!(query_source(&uri("/api/products")), None);
}

#[test]
fn query_source_decodes_like_the_route_handlers() {
    let uri: Uri = "/api/products?sourc%65=shop%69fy".parse().expect("uri");
    assert_eq!(query_source(&uri), Some(Source::Shopify));
}

// ---------------------------------------------------------------------------
// already processed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn processed_requests_pass_through_unnormalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let headers = HashMap::from([(PROCESSED_HEADER, PROCESSED_HEADER_VALUE)]);
    let (response, body) = get(state, "/api/shopify", &headers).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), None);
    let first = &body["products"][0];
    assert!(first["title"].is_string(), "raw fixture keeps title: {first}");
    assert!(first.get("name").is_none(), "raw fixture has no name: {first}");
}

// ---------------------------------------------------------------------------
// list paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_path_is_refetched_and_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify"))
        .and(header(PROCESSED_HEADER, PROCESSED_HEADER_VALUE))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_shopify_list()))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/shopify", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), Some("1"));
    let product = &body["products"][0];
    assert_eq!(product["id"], json!("8001"));
    assert_eq!(product["name"], json!("Canvas Tote"));
    assert_eq!(product["sku"], json!("canvas-tote"));
    assert_eq!(product["price"], json!(35.0));
    assert_eq!(product["image"], json!("https://cdn.example.com/tote.jpg"));
    assert_eq!(product["alt"], json!("Canvas Tote"));
    assert_eq!(product["source"], json!("shopify"));
}

#[tokio::test]
async fn list_path_keeps_query_on_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(wiremock::matchers::query_param("source", "salesforce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_salesforce_list()))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/products?source=salesforce", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["products"][0]["name"], json!("Rain Jacket"));
    assert_eq!(body["products"][0]["source"], json!("salesforce"));
}

#[tokio::test]
async fn non_json_refetch_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/salesforce"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/salesforce", &no_headers()).await;

    // Served by the local fixture route, unnormalized and unmarked.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), None);
    assert!(body["products"].is_array());
}

#[tokio::test]
async fn failed_refetch_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/feed/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/products/feed/latest", &no_headers()).await;

    // No local route for this path either.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(marker(&response), None);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn unrouted_list_sub_path_falls_through_to_json_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify/1/extra"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/shopify/1/extra", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(marker(&response), None);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn unreachable_api_passes_through() {
    let state = test_state(test_config("http://127.0.0.1:1"));
    let (response, body) = get(state, "/api/products", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), None);
    assert!(body["products"].is_array());
}

// ---------------------------------------------------------------------------
// detail paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_path_returns_product_with_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/salesforce"))
        .and(header(PROCESSED_HEADER, PROCESSED_HEADER_VALUE))
        .and(header("x-request-id", "rid-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_salesforce_list()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.detail_cache_secs = 120;
    let headers = HashMap::from([("x-request-id", "rid-7")]);
    let (response, body) = get(test_state(config), "/api/salesforce/RJ-001", &headers).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), Some("1"));
    assert_eq!(
        response.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("public, max-age=120, stale-while-revalidate=120")
    );
    assert_eq!(body["product"]["id"], json!("SFCC-1"));
    assert_eq!(body["product"]["price"], json!(120.0));
    assert_eq!(body["product"]["originalPrice"], json!(150.0));
    assert_eq!(body["product"]["source"], json!("salesforce"));
}

#[tokio::test]
async fn detail_path_matches_encoded_global_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_shopify_list()))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(
        state,
        "/api/shopify/gid%3A%2F%2Fshopify%2FProduct%2F8001",
        &no_headers(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), Some("1"));
    assert_eq!(body["product"]["id"], json!("8001"));
    assert_eq!(body["product"]["name"], json!("Canvas Tote"));
}

#[tokio::test]
async fn detail_path_matches_encoded_sku() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/salesforce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{"id": "SFCC-9", "name": "Wool Scarf", "sku": "WS 001", "price": 40}]
        })))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/salesforce/WS%20001", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["product"]["id"], json!("SFCC-9"));
}

#[tokio::test]
async fn list_path_reads_encoded_source_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_shopify_list()))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.infer_source = false;
    let (response, body) = get(test_state(config), "/api/products?source=shop%69fy", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(marker(&response), Some("1"));
    assert_eq!(body["products"][0]["source"], json!("shopify"));
    assert_eq!(body["products"][0]["id"], json!("8001"));
}

#[tokio::test]
async fn detail_path_unknown_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_shopify_list()))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/shopify/42", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(marker(&response), Some("1"));
    assert!(response.headers().get(CACHE_CONTROL).is_none());
    assert_eq!(
        body,
        json!({"error": "Product with ID 42 not found in source: shopify"})
    );
}

#[tokio::test]
async fn detail_path_invalid_source_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/invalid/1", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid source: invalid"}));
}

#[tokio::test]
async fn detail_path_mirrors_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/api/shopify/8001", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({"error": "Failed to fetch data from source: shopify"})
    );
}

// ---------------------------------------------------------------------------
// vanity paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vanity_path_is_rewritten_to_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/salesforce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_salesforce_list()))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (response, body) = get(state, "/salesforce", &no_headers()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["source"], json!("salesforce"));
    assert_eq!(body["products"][0]["sku"], json!("RJ-001"));
}

#[tokio::test]
async fn shopify_vanity_path_targets_shopify() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shopify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_shopify_list()))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(test_config(&server.uri()));
    let (_, body) = get(state, "/shopify", &no_headers()).await;

    assert_eq!(body["source"], json!("shopify"));
    assert_eq!(body["products"][0]["name"], json!("Canvas Tote"));
}
