//! Visibility run orchestration.
//!
//! A run fans every prompt across every requested platform sequentially,
//! recording one [`VisibilityRecord`] per attempt. Failures never abort the
//! run: a failed specialized platform gets exactly one websearch fallback
//! attempt, and everything else carries on.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use aivis_analyzer::{analyze, MentionReport};
use aivis_core::PlatformIdentity;
use aivis_platform::{
    AuthProvider, PlatformClient, QueryRequest, QueryResult, SessionManager, DEFAULT_QUERY_TIMEOUT,
};

use crate::records::{summarize, VisibilityRecord, VisibilitySummary};

/// Knobs for a visibility run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Pause inserted before every query attempt except the first of the run.
    pub inter_query_delay: Duration,
    pub query_timeout: Duration,
    /// Ask platforms that support it to ground answers in live web results.
    pub enable_web_search: bool,
    /// Checked between attempts; an in-flight query is never interrupted.
    pub cancel: Option<CancellationToken>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            inter_query_delay: Duration::from_secs(2),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            enable_web_search: true,
            cancel: None,
        }
    }
}

/// Drives one visibility run over a session manager and platform client.
pub struct VisibilityChecker<'a, P: AuthProvider> {
    sessions: &'a mut SessionManager<P>,
    client: &'a PlatformClient,
    options: CheckOptions,
}

impl<'a, P: AuthProvider> VisibilityChecker<'a, P> {
    pub fn new(
        sessions: &'a mut SessionManager<P>,
        client: &'a PlatformClient,
        options: CheckOptions,
    ) -> Self {
        Self {
            sessions,
            client,
            options,
        }
    }

    /// Run every prompt against every platform and aggregate the outcome.
    ///
    /// Prompts are the outer loop, platforms the inner one. When a
    /// specialized platform fails and websearch is not already in the
    /// platform list, the same prompt is retried once against websearch and
    /// both attempts are recorded. Cancellation is honored between attempts;
    /// records gathered so far are kept and summarized.
    pub async fn check_visibility(
        &mut self,
        brand: &str,
        competitors: &[String],
        prompts: &[String],
        platforms: &[PlatformIdentity],
    ) -> (Vec<VisibilityRecord>, VisibilitySummary) {
        let fallback_allowed = !platforms.contains(&PlatformIdentity::WebSearch);
        let mut records = Vec::new();
        let mut is_first_query = true;

        tracing::info!(
            brand = %brand,
            prompts = prompts.len(),
            platforms = platforms.len(),
            "starting visibility run"
        );

        'run: for prompt in prompts {
            for &platform in platforms {
                if self.cancelled() {
                    tracing::info!(records = records.len(), "visibility run cancelled");
                    break 'run;
                }

                let record = self
                    .attempt(brand, competitors, prompt, platform, &mut is_first_query)
                    .await;
                let failed = !record.result.success;
                records.push(record);

                if failed && platform != PlatformIdentity::WebSearch && fallback_allowed {
                    if self.cancelled() {
                        tracing::info!(records = records.len(), "visibility run cancelled");
                        break 'run;
                    }
                    tracing::info!(platform = %platform, "falling back to websearch");
                    let fallback = self
                        .attempt(
                            brand,
                            competitors,
                            prompt,
                            PlatformIdentity::WebSearch,
                            &mut is_first_query,
                        )
                        .await;
                    records.push(fallback);
                }
            }
        }

        let summary = summarize(&records);
        tracing::info!(
            total = summary.total_queries,
            successful = summary.successful_queries,
            brand_mentions = summary.brand_mentions,
            "visibility run finished"
        );
        (records, summary)
    }

    fn cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    async fn attempt(
        &mut self,
        brand: &str,
        competitors: &[String],
        prompt: &str,
        platform: PlatformIdentity,
        is_first_query: &mut bool,
    ) -> VisibilityRecord {
        if !*is_first_query && !self.options.inter_query_delay.is_zero() {
            tokio::time::sleep(self.options.inter_query_delay).await;
        }
        *is_first_query = false;

        let started = Instant::now();
        let result = match self.sessions.ensure_session(platform).await {
            Ok(session) => {
                let mut request = QueryRequest::new(platform, prompt.to_string());
                request.enable_web_search =
                    self.options.enable_web_search && platform.supports_web_search();
                request.timeout = self.options.query_timeout;
                self.client.query(session, &request).await
            }
            Err(e) => {
                tracing::warn!(platform = %platform, error = %e, "no session for query");
                QueryResult::failed(&e, started.elapsed())
            }
        };

        // Mention analysis reads the response text only; cited sources are
        // never scanned.
        let mentions = if result.success {
            analyze(&result.response_text, brand, competitors)
        } else {
            MentionReport::empty()
        };

        VisibilityRecord {
            platform,
            prompt: prompt.to_string(),
            result,
            mentions,
            timestamp: Utc::now(),
        }
    }
}
