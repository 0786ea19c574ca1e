//! Mention analysis for brand visibility answers.
//!
//! Given the text an AI platform returned for a prompt, determines whether
//! the watched brand is mentioned (whole-word, case-insensitive), classifies
//! the mention with fixed keyword lexicons, and collects competitor mentions
//! in watchlist order. The analyzer is a pure function of its inputs: no
//! I/O, no error type, no panics.

pub mod analyze;
pub mod report;

pub use analyze::analyze;
pub use report::{MentionReport, MentionType, Sentiment};
