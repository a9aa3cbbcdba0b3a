//! HTTP client for the storefront's own catalog API routes.

mod url;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use storefront_core::{Source, PROCESSED_HEADER, PROCESSED_HEADER_VALUE};

use crate::error::CatalogError;
use crate::normalize::into_product_records;

pub use url::join_api_url;

/// Status and raw body of a re-fetched route. The body is kept as text so
/// the caller decides whether it is JSON.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches product lists from the backend routes (`/api/shopify`,
/// `/api/salesforce`, `/api/products`).
///
/// Every request carries the processed-marker header so the interceptor in
/// front of those routes lets it through untouched. Single attempt per call:
/// no retries.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    api_url: String,
}

impl CatalogClient {
    /// Creates a `CatalogClient` rooted at `api_url` with a request timeout
    /// and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if `api_url` is not an absolute
    /// http(s) URL, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(api_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        // Validate the base once so later joins only fail on bad paths.
        join_api_url(api_url, "/")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the full raw product list of one backend from
    /// `{api_url}/api/{source}`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnexpectedStatus`]: non-2xx response.
    /// - [`CatalogError::Http`]: network or TLS failure, or timeout.
    /// - [`CatalogError::Deserialize`]: body is not JSON.
    pub async fn fetch_source_products(
        &self,
        source: Source,
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, CatalogError> {
        self.fetch_products(&format!("/api/{source}"), request_id)
            .await
    }

    /// Fetches a raw product list from any catalog route path.
    ///
    /// Accepts `{"products": [...]}` or a bare array; any other JSON shape
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_source_products`].
    pub async fn fetch_products(
        &self,
        path: &str,
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, CatalogError> {
        let url = join_api_url(&self.api_url, path)?;
        let response = self.get(&url, request_id).await?;

        if !response.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: response.status,
                url,
            });
        }

        let parsed = serde_json::from_str::<Value>(&response.body).map_err(|e| {
            CatalogError::Deserialize {
                context: format!("product list from {url}"),
                source: e,
            }
        })?;

        let records = into_product_records(parsed);
        tracing::debug!(url = %url, count = records.len(), "fetched product list");
        Ok(records)
    }

    /// Re-issues a request for `path_and_query` against the API base,
    /// returning whatever came back without interpreting it.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidUrl`]: the joined URL does not parse.
    /// - [`CatalogError::Http`]: network or TLS failure, or timeout.
    pub async fn refetch(
        &self,
        path_and_query: &str,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, CatalogError> {
        let url = join_api_url(&self.api_url, path_and_query)?;
        self.get(&url, request_id).await
    }

    async fn get(&self, url: &str, request_id: Option<&str>) -> Result<UpstreamResponse, CatalogError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(PROCESSED_HEADER, PROCESSED_HEADER_VALUE);

        if let Some(id) = request_id.filter(|id| !id.is_empty()) {
            request = request.header("x-request-id", id);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }
}
