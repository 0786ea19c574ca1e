use std::path::PathBuf;

use crate::credentials::Credentials;

#[derive(Clone)]
pub struct AppConfig {
    pub llm_email: Option<String>,
    pub llm_password: Option<String>,
    pub log_level: String,
    pub watchlist_path: PathBuf,
    pub export_dir: PathBuf,
    pub user_agent: String,
    pub query_timeout_secs: u64,
    pub inter_query_delay_ms: u64,
    pub enable_web_search: bool,
}

impl AppConfig {
    /// Credentials for authenticated platforms, if both halves are configured.
    ///
    /// Missing credentials are not a load-time error: unauthenticated
    /// platforms still work, and the session manager reports the failure
    /// per platform when login is actually needed.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.llm_email, &self.llm_password) {
            (Some(email), Some(password)) => {
                Some(Credentials::new(email.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("llm_email", &self.llm_email.as_ref().map(|_| "[redacted]"))
            .field(
                "llm_password",
                &self.llm_password.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("watchlist_path", &self.watchlist_path)
            .field("export_dir", &self.export_dir)
            .field("user_agent", &self.user_agent)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("inter_query_delay_ms", &self.inter_query_delay_ms)
            .field("enable_web_search", &self.enable_web_search)
            .finish()
    }
}
