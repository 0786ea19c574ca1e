//! The browser automation capability behind platform logins.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use aivis_core::{Credentials, PlatformIdentity};

use crate::error::PlatformError;

/// Opaque handle to one live automation session (a browser window, in a
/// real provider). Minted by the provider, meaningful only to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability interface over browser automation.
///
/// The session manager drives login flows through this trait and never sees
/// the automation service underneath. Credentials pass through opaquely:
/// implementations must not log or transform them. Sessions are independent
/// of one another; a failure inside one platform's session must not disturb
/// the others.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Verify the automation capability is reachable. Called once per run;
    /// failure is fatal to the run.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AutomationUnavailable`] when the capability
    /// cannot be reached.
    async fn initialize(&self) -> Result<(), PlatformError>;

    /// Open a fresh automation session for the platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AutomationUnavailable`] when no session can
    /// be opened.
    async fn open_session(
        &self,
        platform: PlatformIdentity,
    ) -> Result<SessionHandle, PlatformError>;

    /// Drive the platform's login flow inside an open session.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Authentication`] when the platform rejects
    /// the login.
    async fn login(
        &self,
        handle: SessionHandle,
        platform: PlatformIdentity,
        credentials: &Credentials,
    ) -> Result<(), PlatformError>;

    /// Release the automation resources behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AutomationUnavailable`] when the release
    /// fails; the session must still be considered gone.
    async fn close_session(&self, handle: SessionHandle) -> Result<(), PlatformError>;
}

#[derive(Default)]
struct ScriptedState {
    open: HashMap<SessionHandle, PlatformIdentity>,
    opened_total: usize,
    closed_total: usize,
}

/// Deterministic automation provider.
///
/// Stands in for a real browser automation service: handles are minted
/// locally and login outcomes are scripted per platform. The default script
/// accepts any non-blank credentials. This is both the shipped provider
/// (driving a real automation vendor is deliberately out of scope) and the
/// double the session manager and orchestrator tests run against.
pub struct ScriptedAuthProvider {
    deny_login: HashSet<PlatformIdentity>,
    fail_close: HashSet<PlatformIdentity>,
    unavailable: bool,
    state: Mutex<ScriptedState>,
}

impl ScriptedAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deny_login: HashSet::new(),
            fail_close: HashSet::new(),
            unavailable: false,
            state: Mutex::new(ScriptedState::default()),
        }
    }

    /// A provider whose `initialize` reports the capability as unreachable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Script login to fail for `platform`.
    #[must_use]
    pub fn deny_login(mut self, platform: PlatformIdentity) -> Self {
        self.deny_login.insert(platform);
        self
    }

    /// Script session release to fail for sessions opened on `platform`.
    #[must_use]
    pub fn fail_close(mut self, platform: PlatformIdentity) -> Self {
        self.fail_close.insert(platform);
        self
    }

    /// Number of sessions currently open.
    pub async fn open_count(&self) -> usize {
        self.state.lock().await.open.len()
    }

    /// Total sessions opened over the provider's lifetime.
    pub async fn opened_total(&self) -> usize {
        self.state.lock().await.opened_total
    }

    /// Total sessions released successfully.
    pub async fn closed_total(&self) -> usize {
        self.state.lock().await.closed_total
    }
}

impl Default for ScriptedAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuthProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(&self) -> Result<(), PlatformError> {
        if self.unavailable {
            return Err(PlatformError::AutomationUnavailable(
                "scripted outage".to_string(),
            ));
        }
        Ok(())
    }

    async fn open_session(
        &self,
        platform: PlatformIdentity,
    ) -> Result<SessionHandle, PlatformError> {
        if self.unavailable {
            return Err(PlatformError::AutomationUnavailable(
                "scripted outage".to_string(),
            ));
        }
        let handle = SessionHandle::new();
        let mut state = self.state.lock().await;
        state.open.insert(handle, platform);
        state.opened_total += 1;
        Ok(handle)
    }

    async fn login(
        &self,
        handle: SessionHandle,
        platform: PlatformIdentity,
        credentials: &Credentials,
    ) -> Result<(), PlatformError> {
        let known = self.state.lock().await.open.contains_key(&handle);
        if !known {
            return Err(PlatformError::Authentication {
                platform,
                reason: "unknown session handle".to_string(),
            });
        }
        if self.deny_login.contains(&platform) {
            return Err(PlatformError::Authentication {
                platform,
                reason: "login rejected".to_string(),
            });
        }
        if credentials.email.trim().is_empty() || credentials.password.trim().is_empty() {
            return Err(PlatformError::Authentication {
                platform,
                reason: "blank credentials".to_string(),
            });
        }
        Ok(())
    }

    async fn close_session(&self, handle: SessionHandle) -> Result<(), PlatformError> {
        let mut state = self.state.lock().await;
        match state.open.remove(&handle) {
            Some(platform) if self.fail_close.contains(&platform) => {
                Err(PlatformError::AutomationUnavailable(format!(
                    "scripted close failure for {platform}"
                )))
            }
            Some(_) => {
                state.closed_total += 1;
                Ok(())
            }
            // Closing an unknown or already-closed handle is a no-op.
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("user@example.com".to_string(), "secret".to_string())
    }

    #[test]
    fn handles_are_unique() {
        assert_ne!(SessionHandle::new(), SessionHandle::new());
    }

    #[tokio::test]
    async fn open_login_close_round_trip() {
        let provider = ScriptedAuthProvider::new();
        provider.initialize().await.unwrap();

        let handle = provider
            .open_session(PlatformIdentity::ChatGpt)
            .await
            .unwrap();
        provider
            .login(handle, PlatformIdentity::ChatGpt, &creds())
            .await
            .unwrap();
        assert_eq!(provider.open_count().await, 1);

        provider.close_session(handle).await.unwrap();
        assert_eq!(provider.open_count().await, 0);
        assert_eq!(provider.closed_total().await, 1);
    }

    #[tokio::test]
    async fn unavailable_provider_fails_initialize() {
        let provider = ScriptedAuthProvider::unavailable();
        let result = provider.initialize().await;
        assert!(
            matches!(result, Err(PlatformError::AutomationUnavailable(_))),
            "expected AutomationUnavailable, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn denied_platform_fails_login() {
        let provider = ScriptedAuthProvider::new().deny_login(PlatformIdentity::Claude);
        let handle = provider
            .open_session(PlatformIdentity::Claude)
            .await
            .unwrap();
        let result = provider
            .login(handle, PlatformIdentity::Claude, &creds())
            .await;
        assert!(
            matches!(
                result,
                Err(PlatformError::Authentication { platform, .. })
                    if platform == PlatformIdentity::Claude
            ),
            "expected Authentication for claude, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn blank_credentials_fail_login() {
        let provider = ScriptedAuthProvider::new();
        let handle = provider
            .open_session(PlatformIdentity::Gemini)
            .await
            .unwrap();
        let blank = Credentials::new(String::new(), String::new());
        let result = provider
            .login(handle, PlatformIdentity::Gemini, &blank)
            .await;
        assert!(result.is_err(), "expected login failure, got: {result:?}");
    }

    #[tokio::test]
    async fn closing_unknown_handle_is_a_no_op() {
        let provider = ScriptedAuthProvider::new();
        let result = provider.close_session(SessionHandle::new()).await;
        assert!(result.is_ok());
        assert_eq!(provider.closed_total().await, 0);
    }
}
