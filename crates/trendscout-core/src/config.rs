use crate::app_config::AppConfig;
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
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` placeholders like `NEWS_API_KEY=` disable a source.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("TRENDSCOUT_LOG_LEVEL", "info");
    let keywords_path = PathBuf::from(or_default("TRENDSCOUT_KEYWORDS_PATH", "daily_keywords.json"));
    let notification_path = PathBuf::from(or_default(
        "TRENDSCOUT_NOTIFICATION_PATH",
        "notification_data.json",
    ));
    let topics_cache_path = optional("TRENDSCOUT_TOPICS_CACHE_PATH").map(PathBuf::from);
    let registry_path = optional("TRENDSCOUT_REGISTRY_PATH").map(PathBuf::from);

    let request_timeout_secs = parse_u64("TRENDSCOUT_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDSCOUT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("TRENDSCOUT_USER_AGENT", "trendscout/0.1 (keyword-discovery)");
    let inter_request_delay_ms = parse_u64("TRENDSCOUT_INTER_REQUEST_DELAY_MS", "500")?;
    let per_source_limit = parse_usize("TRENDSCOUT_PER_SOURCE_LIMIT", "8")?;
    let max_keywords = parse_usize("TRENDSCOUT_MAX_KEYWORDS", "25")?;
    let trends_seeds_per_category = parse_usize("TRENDSCOUT_TRENDS_SEEDS_PER_CATEGORY", "3")?;

    let news_api_key = optional("NEWS_API_KEY");
    let reddit_client_id = optional("REDDIT_CLIENT_ID");
    let reddit_client_secret = optional("REDDIT_CLIENT_SECRET");
    let reddit_user_agent = or_default("REDDIT_USER_AGENT", "trendscout/0.1");

    Ok(AppConfig {
        log_level,
        keywords_path,
        notification_path,
        topics_cache_path,
        registry_path,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        per_source_limit,
        max_keywords,
        trends_seeds_per_category,
        news_api_key,
        reddit_client_id,
        reddit_client_secret,
        reddit_user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
