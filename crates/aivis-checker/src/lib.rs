//! Visibility run orchestration.
//!
//! Fans a set of prompts across a set of platforms in a fixed order, applies
//! the single-fallback policy and the anti-automation query cadence, analyzes
//! successful answers for brand mentions, and aggregates everything into a
//! scorecard plus a timestamped CSV export. Per-query failures are recorded,
//! never raised; a run always finishes with whatever it could collect.

pub mod checker;
pub mod error;
pub mod export;
pub mod records;

pub use checker::{CheckOptions, VisibilityChecker};
pub use error::CheckerError;
pub use export::write_records_csv;
pub use records::{summarize, VisibilityRecord, VisibilitySummary};
