//! Single-attempt HTTP query client for AI answer platforms.
//!
//! Wraps `reqwest` with per-platform endpoints, chat and instant-answer
//! payload shapes, and error classification. The client makes exactly one
//! attempt per call; retry and fallback policy belong to the orchestrator.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use aivis_core::PlatformIdentity;

use crate::error::PlatformError;
use crate::session::Session;
use crate::types::{QueryRequest, QueryResult};

/// HTTP client for platform queries.
///
/// Holds one endpoint per platform. Use [`PlatformClient::new`] for the
/// production endpoints or [`PlatformClient::with_base_url`] to point a
/// platform at a mock server in tests.
pub struct PlatformClient {
    client: Client,
    endpoints: HashMap<PlatformIdentity, Url>,
}

impl PlatformClient {
    /// Creates a client pointed at the production platform endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let mut endpoints = HashMap::new();
        for platform in PlatformIdentity::ALL {
            endpoints.insert(platform, parse_base_url(default_endpoint(platform))?);
        }

        Ok(Self { client, endpoints })
    }

    /// Overrides one platform's base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Configuration`] if `base_url` is not a valid
    /// URL.
    pub fn with_base_url(
        mut self,
        platform: PlatformIdentity,
        base_url: &str,
    ) -> Result<Self, PlatformError> {
        self.endpoints.insert(platform, parse_base_url(base_url)?);
        Ok(self)
    }

    /// Runs one query inside the given session.
    ///
    /// Never returns an error: failures (session mismatch, timeout,
    /// transport, bad status, unparseable body) come back as a
    /// [`QueryResult`] with `success = false`, a classified error message,
    /// and the measured latency. Latency is captured on every path.
    pub async fn query(&self, session: &Session, request: &QueryRequest) -> QueryResult {
        let started = Instant::now();
        let outcome = self.dispatch(session, request).await;
        let latency = started.elapsed();
        match outcome {
            Ok((text, sources)) => QueryResult::ok(text, sources, latency),
            Err(e) => {
                tracing::warn!(platform = %request.platform, error = %e, "query failed");
                QueryResult::failed(&e, latency)
            }
        }
    }

    async fn dispatch(
        &self,
        session: &Session,
        request: &QueryRequest,
    ) -> Result<(String, Vec<String>), PlatformError> {
        let platform = request.platform;
        if session.platform != platform {
            return Err(PlatformError::Configuration(format!(
                "session for {} cannot serve a {platform} query",
                session.platform
            )));
        }
        if platform.requires_auth() && !session.authenticated {
            return Err(PlatformError::Authentication {
                platform,
                reason: "session is not authenticated".to_string(),
            });
        }

        match platform {
            PlatformIdentity::WebSearch => self.search_query(request).await,
            _ => self.chat_query(request).await,
        }
    }

    /// POSTs a chat-completion request and extracts the first answer.
    async fn chat_query(
        &self,
        request: &QueryRequest,
    ) -> Result<(String, Vec<String>), PlatformError> {
        let platform = request.platform;
        let Some(model) = chat_model(platform) else {
            return Err(PlatformError::Configuration(format!(
                "{platform} has no chat endpoint"
            )));
        };

        let url = self.endpoint(platform)?.join("api/chat").map_err(|e| {
            PlatformError::Configuration(format!("invalid chat URL for {platform}: {e}"))
        })?;

        let payload = ChatRequestBody {
            model,
            messages: vec![ChatTurn {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
            stream: false,
            web_search: request.enable_web_search && platform.supports_web_search(),
        };

        let response = self
            .client
            .post(url)
            .timeout(request.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_send_error(platform, request.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::UnexpectedStatus {
                platform,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(platform, request.timeout, e))?;
        let parsed: ChatResponseBody =
            serde_json::from_str(&body).map_err(|e| PlatformError::Deserialize {
                context: format!("chat response from {platform}"),
                source: e,
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(PlatformError::EmptyAnswer { platform })?;

        Ok((choice.message.content, choice.message.sources))
    }

    /// GETs an instant answer from the web-search backend.
    async fn search_query(
        &self,
        request: &QueryRequest,
    ) -> Result<(String, Vec<String>), PlatformError> {
        let platform = request.platform;
        let url = self.endpoint(platform)?.clone();

        let response = self
            .client
            .get(url)
            .timeout(request.timeout)
            .query(&[
                ("q", request.prompt.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| classify_send_error(platform, request.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::UnexpectedStatus {
                platform,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(platform, request.timeout, e))?;
        let parsed: InstantAnswerBody =
            serde_json::from_str(&body).map_err(|e| PlatformError::Deserialize {
                context: format!("instant answer from {platform}"),
                source: e,
            })?;

        let mut sources = Vec::new();
        if !parsed.abstract_url.is_empty() {
            sources.push(parsed.abstract_url);
        }
        Ok((parsed.abstract_text, sources))
    }

    fn endpoint(&self, platform: PlatformIdentity) -> Result<&Url, PlatformError> {
        self.endpoints.get(&platform).ok_or_else(|| {
            PlatformError::Configuration(format!("no endpoint configured for {platform}"))
        })
    }
}

/// Classify a transport failure: timeouts get their own variant so records
/// show the deadline that was missed; everything else stays an HTTP error.
fn classify_send_error(
    platform: PlatformIdentity,
    timeout: Duration,
    err: reqwest::Error,
) -> PlatformError {
    if err.is_timeout() {
        PlatformError::Timeout {
            platform,
            timeout_secs: timeout.as_secs(),
        }
    } else {
        PlatformError::Http(err)
    }
}

/// Normalise: ensure the base URL ends with exactly one slash so that joins
/// append to the path rather than replacing the last segment.
fn parse_base_url(base_url: &str) -> Result<Url, PlatformError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .map_err(|e| PlatformError::Configuration(format!("invalid base URL '{base_url}': {e}")))
}

const fn default_endpoint(platform: PlatformIdentity) -> &'static str {
    match platform {
        PlatformIdentity::ChatGpt => "https://chat.openai.com/",
        PlatformIdentity::Claude => "https://claude.ai/",
        PlatformIdentity::Perplexity => "https://www.perplexity.ai/",
        PlatformIdentity::Gemini => "https://gemini.google.com/",
        PlatformIdentity::WebSearch => "https://api.duckduckgo.com/",
    }
}

/// Chat model requested per platform. `None` for platforms without a chat
/// surface.
const fn chat_model(platform: PlatformIdentity) -> Option<&'static str> {
    match platform {
        PlatformIdentity::ChatGpt => Some("gpt-4o-mini"),
        PlatformIdentity::Claude => Some("claude-3-5-sonnet-20241022"),
        PlatformIdentity::Perplexity => Some("llama-3.1-sonar-small-128k-online"),
        PlatformIdentity::Gemini => Some("gemini-1.5-flash"),
        PlatformIdentity::WebSearch => None,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    stream: bool,
    web_search: bool,
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Debug, Deserialize)]
struct ChatAnswer {
    content: String,
    #[serde(default)]
    sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InstantAnswerBody {
    #[serde(default, rename = "Abstract")]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
}
