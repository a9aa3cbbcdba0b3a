pub mod app_config;
pub mod config;
pub mod products;
pub mod source;

pub use app_config::{AltTextPrecedence, AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{NormalizedProduct, ProductList};
pub use source::Source;

use thiserror::Error;

/// Request/response header marking traffic the interceptor has already
/// handled. Its own outbound re-fetches carry it so they are not intercepted
/// a second time.
pub const PROCESSED_HEADER: &str = "x-middleware-processed";

/// Value written to [`PROCESSED_HEADER`].
pub const PROCESSED_HEADER_VALUE: &str = "1";

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
