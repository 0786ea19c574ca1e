use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// Credentials (`LLM_EMAIL` / `LLM_PASSWORD`) are optional here; platforms that
/// require login fail individually at session time when they are absent.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let llm_email = lookup("LLM_EMAIL").ok();
    let llm_password = lookup("LLM_PASSWORD").ok();

    let log_level = or_default("AIVIS_LOG_LEVEL", "info");
    let watchlist_path =
        PathBuf::from(or_default("AIVIS_WATCHLIST_PATH", "./config/watchlist.yaml"));
    let export_dir = PathBuf::from(or_default("AIVIS_EXPORT_DIR", "./results"));
    let user_agent = or_default("AIVIS_USER_AGENT", "aivis/0.1 (brand-visibility)");

    let query_timeout_secs = parse_u64("AIVIS_QUERY_TIMEOUT_SECS", "30")?;
    let inter_query_delay_ms = parse_u64("AIVIS_INTER_QUERY_DELAY_MS", "2000")?;
    let enable_web_search = parse_bool("AIVIS_ENABLE_WEB_SEARCH", "true")?;

    Ok(AppConfig {
        llm_email,
        llm_password,
        log_level,
        watchlist_path,
        export_dir,
        user_agent,
        query_timeout_secs,
        inter_query_delay_ms,
        enable_web_search,
    })
}
