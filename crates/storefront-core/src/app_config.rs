use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which alt text wins when a product carries both an explicit `alt` and an
/// image node with its own `altText`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AltTextPrecedence {
    /// `alt`, then the product name, then the fixed fallback.
    #[default]
    NameFirst,
    /// The first image edge's `altText`, then the `NameFirst` chain.
    ImageFirst,
}

impl std::fmt::Display for AltTextPrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AltTextPrecedence::NameFirst => write!(f, "name-first"),
            AltTextPrecedence::ImageFirst => write!(f, "image-first"),
        }
    }
}

impl std::str::FromStr for AltTextPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-first" => Ok(AltTextPrecedence::NameFirst),
            "image-first" => Ok(AltTextPrecedence::ImageFirst),
            other => Err(format!(
                "unknown alt text precedence \"{other}\"; expected name-first or image-first"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL the service uses to reach its own API routes (lookup fetches
    /// and interceptor re-fetches).
    pub api_url: String,
    /// Directory holding the simulated backend fixture files.
    pub fixtures_dir: PathBuf,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    /// `max-age` / `stale-while-revalidate` for successful detail lookups.
    pub detail_cache_secs: u64,
    pub alt_precedence: AltTextPrecedence,
    /// Stamp an inferred source on list records whose route names none.
    pub infer_source: bool,
}
