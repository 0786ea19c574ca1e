//! Request and result types for platform queries.

use std::time::Duration;

use serde::Serialize;

use aivis_core::PlatformIdentity;

use crate::error::PlatformError;

/// Default per-query deadline.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// One prompt aimed at one platform.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub platform: PlatformIdentity,
    pub prompt: String,
    /// Ask the platform to ground its answer in live web results. Only
    /// forwarded where the platform supports it.
    pub enable_web_search: bool,
    pub timeout: Duration,
}

impl QueryRequest {
    #[must_use]
    pub fn new(platform: PlatformIdentity, prompt: String) -> Self {
        Self {
            platform,
            prompt,
            enable_web_search: false,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// What came back from one query attempt.
///
/// Failures are values here, not errors: a failed attempt still carries its
/// measured latency and a classification of what went wrong, so the run can
/// record it and move on. Built through [`QueryResult::ok`] and
/// [`QueryResult::failed`]; never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub success: bool,
    pub response_text: String,
    /// Source URLs cited by the platform, in citation order.
    pub sources: Vec<String>,
    pub latency: Duration,
    pub error_message: Option<String>,
}

impl QueryResult {
    #[must_use]
    pub fn ok(response_text: String, sources: Vec<String>, latency: Duration) -> Self {
        Self {
            success: true,
            response_text,
            sources,
            latency,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failed(error: &PlatformError, latency: Duration) -> Self {
        Self {
            success: false,
            response_text: String::new(),
            sources: Vec::new(),
            latency,
            error_message: Some(error.to_string()),
        }
    }
}
