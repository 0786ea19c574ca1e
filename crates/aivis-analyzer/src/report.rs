use serde::{Deserialize, Serialize};

/// How the brand appeared in a response, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionType {
    None,
    Mentioned,
    Positive,
    Negative,
}

impl MentionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MentionType::None => "none",
            MentionType::Mentioned => "mentioned",
            MentionType::Positive => "positive",
            MentionType::Negative => "negative",
        }
    }
}

impl std::fmt::Display for MentionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lexicon-derived tone of the response around the brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What one response said about the brand and its competitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionReport {
    pub brand_mentioned: bool,
    pub mention_type: MentionType,
    /// Competitor names found in the text, in watchlist order, deduplicated.
    pub competitors_mentioned: Vec<String>,
    pub sentiment: Sentiment,
}

impl MentionReport {
    /// The no-findings report: used as the starting state of analysis and as
    /// the report attached to failed queries, which have no text to analyze.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            brand_mentioned: false,
            mention_type: MentionType::None,
            competitors_mentioned: Vec::new(),
            sentiment: Sentiment::Neutral,
        }
    }
}
