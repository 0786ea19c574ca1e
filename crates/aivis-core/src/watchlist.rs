use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformIdentity;
use crate::ConfigError;

/// The brand under watch, its competitors, and the prompt/platform matrix
/// one visibility run covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub brand: String,
    #[serde(default)]
    pub competitors: Vec<String>,
    pub prompts: Vec<String>,
    pub platforms: Vec<PlatformIdentity>,
}

/// Load and validate a watchlist from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<Watchlist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let watchlist: Watchlist =
        serde_yaml::from_str(&content).map_err(ConfigError::WatchlistParse)?;

    validate_watchlist(&watchlist)?;

    Ok(watchlist)
}

/// Validate a watchlist, wherever it came from.
///
/// Public because the CLI applies flag overrides on top of a loaded file and
/// must re-validate the merged result.
///
/// # Errors
///
/// Returns `ConfigError::Validation` naming the first offending field.
pub fn validate_watchlist(watchlist: &Watchlist) -> Result<(), ConfigError> {
    if watchlist.brand.trim().is_empty() {
        return Err(ConfigError::Validation(
            "brand must be non-empty".to_string(),
        ));
    }

    if watchlist.prompts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one prompt is required".to_string(),
        ));
    }
    for prompt in &watchlist.prompts {
        if prompt.trim().is_empty() {
            return Err(ConfigError::Validation(
                "prompts must be non-empty".to_string(),
            ));
        }
    }

    if watchlist.platforms.is_empty() {
        return Err(ConfigError::Validation(
            "at least one platform is required".to_string(),
        ));
    }
    let mut seen_platforms = HashSet::new();
    for platform in &watchlist.platforms {
        if !seen_platforms.insert(*platform) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform: '{platform}'"
            )));
        }
    }

    let mut seen_competitors = HashSet::new();
    for competitor in &watchlist.competitors {
        if competitor.trim().is_empty() {
            return Err(ConfigError::Validation(
                "competitor names must be non-empty".to_string(),
            ));
        }
        if !seen_competitors.insert(competitor.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor: '{competitor}'"
            )));
        }
    }

    Ok(())
}
