//! Per-attempt records and the run-level scorecard.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use aivis_analyzer::MentionReport;
use aivis_core::PlatformIdentity;
use aivis_platform::QueryResult;

/// Outcome of one attempt of one prompt against one platform.
///
/// Records are appended to the run's list as attempts happen, fallbacks and
/// failures included, and never mutated afterwards. Failed attempts carry an
/// empty mention report since there is no text to analyze.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityRecord {
    pub platform: PlatformIdentity,
    pub prompt: String,
    pub result: QueryResult,
    pub mentions: MentionReport,
    pub timestamp: DateTime<Utc>,
}

/// Run-level scorecard derived from the records.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilitySummary {
    pub total_queries: usize,
    pub successful_queries: usize,
    pub brand_mentions: usize,
    /// Share of successful queries that mentioned the brand, in `[0, 1]`.
    pub mention_rate: f64,
    /// Mean latency over successful queries only.
    pub average_response_time: Duration,
}

/// Aggregate a run's records into a summary.
///
/// `total_queries` counts every attempt. Mention counts and latency average
/// over successful queries only, so unreachable platforms cannot drag the
/// numbers down. With zero successes the rate and average are both zero
/// rather than a division by zero.
#[must_use]
pub fn summarize(records: &[VisibilityRecord]) -> VisibilitySummary {
    let total_queries = records.len();
    let successful: Vec<&VisibilityRecord> =
        records.iter().filter(|r| r.result.success).collect();
    let successful_queries = successful.len();
    let brand_mentions = successful
        .iter()
        .filter(|r| r.mentions.brand_mentioned)
        .count();

    let (mention_rate, average_response_time) = if successful_queries == 0 {
        (0.0, Duration::ZERO)
    } else {
        let total_latency: Duration = successful.iter().map(|r| r.result.latency).sum();
        #[allow(clippy::cast_precision_loss)]
        let rate = brand_mentions as f64 / successful_queries as f64;
        let divisor = u32::try_from(successful_queries).unwrap_or(u32::MAX);
        (rate, total_latency / divisor)
    };

    VisibilitySummary {
        total_queries,
        successful_queries,
        brand_mentions,
        mention_rate,
        average_response_time,
    }
}
