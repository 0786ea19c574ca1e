use thiserror::Error;

use aivis_core::PlatformIdentity;

/// Errors raised while managing platform sessions or running queries.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Client or endpoint setup is invalid, such as a base URL that does
    /// not parse or a session offered to a platform it was not opened for.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Login failed for one platform. Other platforms are unaffected.
    #[error("authentication failed for {platform}: {reason}")]
    Authentication {
        platform: PlatformIdentity,
        reason: String,
    },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The query did not complete within its deadline.
    #[error("query to {platform} timed out after {timeout_secs}s")]
    Timeout {
        platform: PlatformIdentity,
        timeout_secs: u64,
    },

    /// The platform answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status} from {platform}")]
    UnexpectedStatus {
        platform: PlatformIdentity,
        status: u16,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed as JSON but carried no answer.
    #[error("response from {platform} contained no answer")]
    EmptyAnswer { platform: PlatformIdentity },

    /// The browser automation capability is unreachable. Fatal for the run.
    #[error("automation provider unavailable: {0}")]
    AutomationUnavailable(String),
}
