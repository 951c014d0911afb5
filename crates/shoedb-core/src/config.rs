use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://kari.com/catalog/muzhchinam/muzhskaya-obuv/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_nonzero_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let log_level = or_default("SHOEDB_LOG_LEVEL", "info");

    let catalog_base_url = or_default("SHOEDB_CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL);
    if !(catalog_base_url.starts_with("http://") || catalog_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOEDB_CATALOG_BASE_URL".to_string(),
            reason: format!("\"{catalog_base_url}\" is not an http(s) URL"),
        });
    }

    let total_pages = parse_u32("SHOEDB_TOTAL_PAGES", "172")?;
    let page_delay_ms = parse_u64("SHOEDB_PAGE_DELAY_MS", "2000")?;
    let selectors_path = lookup("SHOEDB_SELECTORS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let max_concurrent_items = parse_nonzero_usize("SHOEDB_MAX_CONCURRENT_ITEMS", "32")?;
    let writer_queue_depth = parse_nonzero_usize("SHOEDB_WRITER_QUEUE_DEPTH", "256")?;

    let db_max_connections = parse_u32("SHOEDB_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("SHOEDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SHOEDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let db_max_retries = parse_u32("SHOEDB_DB_MAX_RETRIES", "0")?;

    let scraper_request_timeout_secs = parse_u64("SHOEDB_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("SHOEDB_SCRAPER_USER_AGENT", "shoedb/0.1 (catalog-loader)");
    let scraper_max_retries = parse_u32("SHOEDB_SCRAPER_MAX_RETRIES", "0")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("SHOEDB_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        database_url,
        log_level,
        catalog_base_url,
        total_pages,
        page_delay_ms,
        selectors_path,
        max_concurrent_items,
        writer_queue_depth,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        db_max_retries,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
