//! Whole-word mention matching and lexicon classification.

use regex::{Regex, RegexBuilder};

use crate::report::{MentionReport, MentionType, Sentiment};

/// Words that mark a mention as positive. Checked before the negative
/// lexicon; a text containing words from both lexicons classifies positive.
pub(crate) const POSITIVE_WORDS: &[&str] = &[
    "best",
    "top",
    "leading",
    "excellent",
    "recommended",
    "premier",
    "outstanding",
];

/// Words that mark a mention as negative.
pub(crate) const NEGATIVE_WORDS: &[&str] = &[
    "worst", "bad", "poor", "avoid", "problem", "issue", "terrible",
];

/// Case-insensitive whole-word pattern for a brand or competitor name.
///
/// The name is regex-escaped so punctuation in product names stays literal.
/// Returns `None` for blank names and for names the regex engine rejects;
/// both mean "never matches" rather than an error.
fn word_pattern(name: &str) -> Option<Regex> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let pattern = format!(r"\b{}\b", regex::escape(trimmed));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// Analyze one response text for brand and competitor mentions.
///
/// Brand and competitor names match as whole words, case-insensitively, so
/// "Search" does not match inside "Research". The sentiment lexicons match
/// as substrings of the lowercased text, which mirrors how marketing copy
/// uses them ("top-rated", "best-in-class") at the cost of occasional hits
/// inside unrelated words. Sentiment is only classified when the brand is
/// mentioned; competitor collection runs regardless.
#[must_use]
pub fn analyze(text: &str, brand: &str, competitors: &[String]) -> MentionReport {
    let mut report = MentionReport::empty();
    if text.is_empty() {
        return report;
    }

    if let Some(pattern) = word_pattern(brand) {
        if pattern.is_match(text) {
            report.brand_mentioned = true;
            let text_lower = text.to_lowercase();
            if POSITIVE_WORDS.iter().any(|w| text_lower.contains(w)) {
                report.mention_type = MentionType::Positive;
                report.sentiment = Sentiment::Positive;
            } else if NEGATIVE_WORDS.iter().any(|w| text_lower.contains(w)) {
                report.mention_type = MentionType::Negative;
                report.sentiment = Sentiment::Negative;
            } else {
                report.mention_type = MentionType::Mentioned;
            }
        }
    }

    for competitor in competitors {
        let Some(pattern) = word_pattern(competitor) else {
            continue;
        };
        if pattern.is_match(text) && !report.competitors_mentioned.contains(competitor) {
            report.competitors_mentioned.push(competitor.clone());
        }
    }

    report
}

#[cfg(test)]
#[path = "analyze_test.rs"]
mod tests;
