use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The AI answer platforms the monitor knows how to query.
///
/// The set is closed: adding a platform means adding a variant and its
/// client dispatch arm, not a runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformIdentity {
    ChatGpt,
    Claude,
    Perplexity,
    Gemini,
    WebSearch,
}

impl PlatformIdentity {
    /// Every known platform, in display order.
    pub const ALL: [PlatformIdentity; 5] = [
        PlatformIdentity::ChatGpt,
        PlatformIdentity::Claude,
        PlatformIdentity::Perplexity,
        PlatformIdentity::Gemini,
        PlatformIdentity::WebSearch,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformIdentity::ChatGpt => "chatgpt",
            PlatformIdentity::Claude => "claude",
            PlatformIdentity::Perplexity => "perplexity",
            PlatformIdentity::Gemini => "gemini",
            PlatformIdentity::WebSearch => "websearch",
        }
    }

    /// Whether queries against this platform need an authenticated session first.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        match self {
            PlatformIdentity::ChatGpt | PlatformIdentity::Claude | PlatformIdentity::Gemini => true,
            PlatformIdentity::Perplexity | PlatformIdentity::WebSearch => false,
        }
    }

    /// Whether the platform can augment its answer with live web search.
    #[must_use]
    pub fn supports_web_search(self) -> bool {
        match self {
            PlatformIdentity::Claude => false,
            PlatformIdentity::ChatGpt
            | PlatformIdentity::Perplexity
            | PlatformIdentity::Gemini
            | PlatformIdentity::WebSearch => true,
        }
    }
}

impl std::fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlatformIdentity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chatgpt" => Ok(PlatformIdentity::ChatGpt),
            "claude" => Ok(PlatformIdentity::Claude),
            "perplexity" => Ok(PlatformIdentity::Perplexity),
            "gemini" => Ok(PlatformIdentity::Gemini),
            "websearch" => Ok(PlatformIdentity::WebSearch),
            other => Err(ConfigError::Validation(format!(
                "unknown platform '{other}'; expected one of: chatgpt, claude, perplexity, gemini, websearch"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_round_trips_every_platform() {
        for platform in PlatformIdentity::ALL {
            let parsed: PlatformIdentity = platform.as_str().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        let parsed: PlatformIdentity = "ChatGPT".parse().unwrap();
        assert_eq!(parsed, PlatformIdentity::ChatGpt);
    }

    #[test]
    fn from_str_rejects_unknown_platform() {
        let result = "bingchat".parse::<PlatformIdentity>();
        assert!(
            matches!(result, Err(ConfigError::Validation(_))),
            "expected Validation error, got: {result:?}"
        );
    }

    #[test]
    fn auth_required_platforms() {
        assert!(PlatformIdentity::ChatGpt.requires_auth());
        assert!(PlatformIdentity::Claude.requires_auth());
        assert!(PlatformIdentity::Gemini.requires_auth());
        assert!(!PlatformIdentity::Perplexity.requires_auth());
        assert!(!PlatformIdentity::WebSearch.requires_auth());
    }

    #[test]
    fn web_search_capability() {
        assert!(PlatformIdentity::ChatGpt.supports_web_search());
        assert!(!PlatformIdentity::Claude.supports_web_search());
        assert!(PlatformIdentity::Perplexity.supports_web_search());
        assert!(PlatformIdentity::Gemini.supports_web_search());
        assert!(PlatformIdentity::WebSearch.supports_web_search());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PlatformIdentity::WebSearch).unwrap();
        assert_eq!(json, "\"websearch\"");
        let parsed: PlatformIdentity = serde_json::from_str("\"perplexity\"").unwrap();
        assert_eq!(parsed, PlatformIdentity::Perplexity);
    }
}
