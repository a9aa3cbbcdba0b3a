use crate::error::CatalogError;

/// Joins the API base URL and a route path (with optional query).
///
/// Given `"http://127.0.0.1:3000/"` and `"/api/shopify?x=1"`, returns
/// `"http://127.0.0.1:3000/api/shopify?x=1"`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidUrl`] if the result is not an absolute
/// http(s) URL.
pub fn join_api_url(api_url: &str, path_and_query: &str) -> Result<String, CatalogError> {
    let base = api_url.trim_end_matches('/');
    let path = path_and_query.trim_start_matches('/');
    let joined = format!("{base}/{path}");

    match reqwest::Url::parse(&joined) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(joined),
        Ok(url) => Err(CatalogError::InvalidUrl {
            url: joined,
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        }),
        Err(e) => Err(CatalogError::InvalidUrl {
            url: joined,
            reason: e.to_string(),
        }),
    }
}
