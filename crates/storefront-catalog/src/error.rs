use storefront_core::Source;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid catalog URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure modes of a single-product lookup. `Display` is the message
/// returned to callers in the `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Failed to fetch data from source: {backend}")]
    Upstream { backend: Source, status: u16 },

    #[error("Product with ID {id} not found in source: {backend}")]
    NotFound { id: String, backend: Source },

    #[error("{0}")]
    Internal(String),
}

impl LookupError {
    /// HTTP status the lookup result maps to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidSource(_) => 400,
            LookupError::Upstream { status, .. } => *status,
            LookupError::NotFound { .. } => 404,
            LookupError::Internal(_) => 500,
        }
    }

    /// A non-success upstream status keeps its code; anything else (transport
    /// failure, undecodable body) is an internal failure.
    pub(crate) fn from_catalog(backend: Source, error: CatalogError) -> Self {
        match error {
            CatalogError::UnexpectedStatus { status, .. } => {
                LookupError::Upstream { backend, status }
            }
            other => LookupError::Internal(other.to_string()),
        }
    }
}
