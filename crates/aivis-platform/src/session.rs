//! Per-run session ownership and login orchestration.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use aivis_core::{Credentials, PlatformIdentity};

use crate::error::PlatformError;
use crate::provider::{AuthProvider, SessionHandle};

/// One platform's live automation session.
#[derive(Debug, Clone)]
pub struct Session {
    pub platform: PlatformIdentity,
    pub authenticated: bool,
    pub created_at: DateTime<Utc>,
    pub handle: SessionHandle,
}

/// Owns every platform session for one visibility run.
///
/// Sessions are opened lazily, one per platform, and reused for the whole
/// run; [`SessionManager::cleanup`] releases them together at the end. A
/// platform whose login failed is excluded from the rest of the run rather
/// than retrying the flow on every query.
pub struct SessionManager<P: AuthProvider> {
    provider: P,
    sessions: HashMap<PlatformIdentity, Session>,
    auth_failed: HashSet<PlatformIdentity>,
}

impl<P: AuthProvider> SessionManager<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sessions: HashMap::new(),
            auth_failed: HashSet::new(),
        }
    }

    /// Verify the automation capability is reachable before any sessions open.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AutomationUnavailable`] when it is not.
    /// Callers treat that as fatal for the run.
    pub async fn initialize(&self) -> Result<(), PlatformError> {
        self.provider.initialize().await?;
        tracing::debug!(provider = %self.provider.name(), "automation provider ready");
        Ok(())
    }

    /// Log into one platform, opening its session on first use.
    ///
    /// Returns `true` on success. Re-authenticating a platform that already
    /// holds an authenticated session is a no-op returning `true`; a session
    /// opened without login is logged in as-is rather than replaced. On
    /// failure the platform is marked failed so later queries skip it; other
    /// platforms are unaffected.
    pub async fn authenticate(
        &mut self,
        platform: PlatformIdentity,
        credentials: &Credentials,
    ) -> bool {
        if self
            .sessions
            .get(&platform)
            .is_some_and(|s| s.authenticated)
        {
            return true;
        }

        match self.login(platform, credentials).await {
            Ok(()) => {
                self.auth_failed.remove(&platform);
                tracing::info!(platform = %platform, "authenticated");
                true
            }
            Err(e) => {
                tracing::warn!(platform = %platform, error = %e, "authentication failed");
                self.auth_failed.insert(platform);
                false
            }
        }
    }

    /// Run the login flow on the platform's existing session, or on a fresh
    /// one when none is open yet. The platform holds at most one automation
    /// resource either way; on failure that resource is released.
    async fn login(
        &mut self,
        platform: PlatformIdentity,
        credentials: &Credentials,
    ) -> Result<(), PlatformError> {
        let handle = match self.sessions.get(&platform) {
            Some(session) => session.handle,
            None => self.provider.open_session(platform).await?,
        };

        if let Err(e) = self.provider.login(handle, platform, credentials).await {
            self.sessions.remove(&platform);
            if let Err(close_err) = self.provider.close_session(handle).await {
                tracing::warn!(
                    platform = %platform,
                    error = %close_err,
                    "failed to close session after login failure"
                );
            }
            return Err(e);
        }

        if let Some(session) = self.sessions.get_mut(&platform) {
            session.authenticated = true;
        } else {
            self.sessions.insert(
                platform,
                Session {
                    platform,
                    authenticated: true,
                    created_at: Utc::now(),
                    handle,
                },
            );
        }
        Ok(())
    }

    /// Get the platform's live session, opening an unauthenticated one on
    /// first use for platforms that work without login.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Authentication`] for auth-required platforms
    /// with no authenticated session, including platforms whose login already
    /// failed this run. Returns [`PlatformError::AutomationUnavailable`] when
    /// a session cannot be opened.
    pub async fn ensure_session(
        &mut self,
        platform: PlatformIdentity,
    ) -> Result<&Session, PlatformError> {
        if self.auth_failed.contains(&platform) {
            return Err(PlatformError::Authentication {
                platform,
                reason: "authentication already failed this run".to_string(),
            });
        }

        if !self.sessions.contains_key(&platform) {
            if platform.requires_auth() {
                return Err(PlatformError::Authentication {
                    platform,
                    reason: "no authenticated session; authenticate first".to_string(),
                });
            }
            let handle = self.provider.open_session(platform).await?;
            self.sessions.insert(
                platform,
                Session {
                    platform,
                    authenticated: false,
                    created_at: Utc::now(),
                    handle,
                },
            );
        }

        self.sessions
            .get(&platform)
            .ok_or_else(|| PlatformError::Authentication {
                platform,
                reason: "session missing after open".to_string(),
            })
    }

    /// Whether the platform holds a live session.
    #[must_use]
    pub fn has_session(&self, platform: PlatformIdentity) -> bool {
        self.sessions.contains_key(&platform)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Release every open session.
    ///
    /// Failures are logged per platform and do not stop the remaining
    /// releases. Safe to call repeatedly; a second call is a no-op.
    pub async fn cleanup(&mut self) {
        for (platform, session) in self.sessions.drain() {
            if let Err(e) = self.provider.close_session(session.handle).await {
                tracing::warn!(platform = %platform, error = %e, "failed to release session");
            }
        }
        self.auth_failed.clear();
    }
}
