use crate::app_config::{AltTextPrecedence, AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;

    let bind_addr = or_default("STOREFRONT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFRONT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let api_url = or_default("STOREFRONT_API_URL", "http://127.0.0.1:3000");
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(invalid(
            "STOREFRONT_API_URL",
            format!("\"{api_url}\" is not an http(s) URL"),
        ));
    }
    let api_url = api_url.trim_end_matches('/').to_string();

    let fixtures_dir = PathBuf::from(or_default("STOREFRONT_FIXTURES_DIR", "./fixtures"));
    let upstream_timeout_secs = parse_u64("STOREFRONT_UPSTREAM_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (catalog-normalizer)");
    let detail_cache_secs = parse_u64("STOREFRONT_DETAIL_CACHE_SECS", "60")?;
    let alt_precedence = or_default("STOREFRONT_ALT_PRECEDENCE", "name-first")
        .parse::<AltTextPrecedence>()
        .map_err(|reason| invalid("STOREFRONT_ALT_PRECEDENCE", reason))?;
    let infer_source = parse_bool("STOREFRONT_INFER_SOURCE", "true")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_url,
        fixtures_dir,
        upstream_timeout_secs,
        user_agent,
        detail_cache_secs,
        alt_precedence,
        infer_source,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
