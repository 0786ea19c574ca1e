pub mod app_config;
pub mod config;
pub mod credentials;
pub mod platform;
pub mod watchlist;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::Credentials;
pub use platform::PlatformIdentity;
pub use watchlist::{load_watchlist, Watchlist};

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watchlist file {path}: {source}")]
    WatchlistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watchlist file: {0}")]
    WatchlistParse(serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
