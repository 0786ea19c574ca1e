//! End-to-end visibility runs against mock platform backends.

use std::time::{Duration, Instant};

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aivis_analyzer::{MentionType, Sentiment};
use aivis_checker::{CheckOptions, VisibilityChecker};
use aivis_core::{Credentials, PlatformIdentity};
use aivis_platform::{PlatformClient, ScriptedAuthProvider, SessionManager};

fn chat_answer(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "content": content, "sources": [] } }
        ]
    })
}

fn instant_answer(text: &str) -> serde_json::Value {
    json!({ "Abstract": text, "AbstractURL": "https://example.com/answer" })
}

fn fast_options() -> CheckOptions {
    CheckOptions {
        inter_query_delay: Duration::ZERO,
        ..CheckOptions::default()
    }
}

fn client_for(server: &MockServer, platforms: &[PlatformIdentity]) -> PlatformClient {
    let mut client = PlatformClient::new(5, "aivis-test/0.1").expect("client should build");
    for &platform in platforms {
        client = client
            .with_base_url(platform, &server.uri())
            .expect("mock base URL should parse");
    }
    client
}

#[tokio::test]
async fn failed_specialized_query_falls_back_to_websearch_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "best-ai-seo-tools"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(instant_answer("AIO Search leads the 2025 rankings.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        &[PlatformIdentity::Perplexity, PlatformIdentity::WebSearch],
    );
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let mut checker = VisibilityChecker::new(&mut sessions, &client, fast_options());

    let (records, summary) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["best-ai-seo-tools".to_string()],
            &[PlatformIdentity::Perplexity],
        )
        .await;

    assert_eq!(
        records.len(),
        2,
        "expected original attempt plus fallback, got: {records:?}"
    );
    assert_eq!(records[0].platform, PlatformIdentity::Perplexity);
    assert!(!records[0].result.success);
    assert_eq!(records[1].platform, PlatformIdentity::WebSearch);
    assert!(records[1].result.success);
    assert!(records[1].mentions.brand_mentioned);

    assert_eq!(summary.total_queries, 2);
    assert_eq!(summary.successful_queries, 1);
    assert_eq!(summary.brand_mentions, 1);
    assert!((summary.mention_rate - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn fallback_is_skipped_when_websearch_is_already_listed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(instant_answer("Nothing about the brand.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        &[PlatformIdentity::Perplexity, PlatformIdentity::WebSearch],
    );
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let mut checker = VisibilityChecker::new(&mut sessions, &client, fast_options());

    let (records, summary) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["ai-visibility".to_string()],
            &[PlatformIdentity::Perplexity, PlatformIdentity::WebSearch],
        )
        .await;

    assert_eq!(
        records.len(),
        2,
        "no extra fallback attempt expected, got: {records:?}"
    );
    assert_eq!(records[0].platform, PlatformIdentity::Perplexity);
    assert_eq!(records[1].platform, PlatformIdentity::WebSearch);
    assert_eq!(summary.total_queries, 2);
}

#[tokio::test]
async fn failures_are_recorded_and_the_run_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "alpha"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "beta"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(instant_answer("AIO Search tops the list.")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "gamma"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(instant_answer("Unrelated results only.")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, &[PlatformIdentity::WebSearch]);
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let mut checker = VisibilityChecker::new(&mut sessions, &client, fast_options());

    let prompts = ["alpha", "beta", "gamma"].map(String::from);
    let (records, summary) = checker
        .check_visibility("AIO Search", &[], &prompts, &[PlatformIdentity::WebSearch])
        .await;

    assert_eq!(records.len(), 3);
    assert!(!records[0].result.success);
    assert!(records[0].result.error_message.is_some());
    assert!(records[1].result.success);
    assert!(records[2].result.success);

    assert_eq!(summary.total_queries, 3);
    assert_eq!(summary.successful_queries, 2);
    assert_eq!(summary.brand_mentions, 1);
    assert!((summary.mention_rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn auth_failed_platform_is_recorded_without_a_network_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_answer("should never be served")),
        )
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(instant_answer("AIO Search shows up in web results.")),
        )
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        &[PlatformIdentity::Claude, PlatformIdentity::WebSearch],
    );
    let provider = ScriptedAuthProvider::new().deny_login(PlatformIdentity::Claude);
    let mut sessions = SessionManager::new(provider);
    let credentials = Credentials::new("user@example.com".to_string(), "secret".to_string());
    assert!(
        !sessions
            .authenticate(PlatformIdentity::Claude, &credentials)
            .await
    );

    let mut checker = VisibilityChecker::new(&mut sessions, &client, fast_options());
    let (records, summary) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["ai-search-tools".to_string()],
            &[PlatformIdentity::Claude, PlatformIdentity::WebSearch],
        )
        .await;

    assert_eq!(records.len(), 2);
    assert!(!records[0].result.success);
    let message = records[0].result.error_message.clone().unwrap();
    assert!(
        message.contains("authentication failed"),
        "expected an authentication failure, got: {message}"
    );
    assert!(records[1].result.success);
    assert_eq!(summary.successful_queries, 1);
}

#[tokio::test]
async fn cancelled_token_stops_the_run_before_any_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instant_answer("never served")))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let options = CheckOptions {
        cancel: Some(cancel),
        ..fast_options()
    };

    let client = client_for(&server, &[PlatformIdentity::WebSearch]);
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let mut checker = VisibilityChecker::new(&mut sessions, &client, options);

    let (records, summary) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["anything".to_string()],
            &[PlatformIdentity::WebSearch],
        )
        .await;

    assert!(records.is_empty());
    assert_eq!(summary.total_queries, 0);
    assert_eq!(summary.mention_rate, 0.0);
}

#[tokio::test]
async fn chat_answer_is_analyzed_for_brand_and_competitors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_answer(
            "AIO Search is the best tool for AI visibility. SEMrush is popular too.",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server, &[PlatformIdentity::Perplexity]);
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let mut checker = VisibilityChecker::new(&mut sessions, &client, fast_options());

    let competitors = ["SEMrush", "Ahrefs"].map(String::from);
    let (records, summary) = checker
        .check_visibility(
            "AIO Search",
            &competitors,
            &["best-ai-seo-tools".to_string()],
            &[PlatformIdentity::Perplexity],
        )
        .await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert!(record.result.success);
    assert!(record.mentions.brand_mentioned);
    assert_eq!(record.mentions.mention_type, MentionType::Positive);
    assert_eq!(record.mentions.sentiment, Sentiment::Positive);
    assert_eq!(
        record.mentions.competitors_mentioned,
        vec!["SEMrush".to_string()]
    );

    assert_eq!(summary.brand_mentions, 1);
    assert!((summary.mention_rate - 1.0).abs() < f64::EPSILON);
    assert!(summary.average_response_time > Duration::ZERO);
}

#[tokio::test]
async fn delay_is_skipped_before_the_first_query_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instant_answer("quick answer")))
        .mount(&server)
        .await;

    let client = client_for(&server, &[PlatformIdentity::WebSearch]);

    // A single query must not wait out the configured delay.
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let options = CheckOptions {
        inter_query_delay: Duration::from_secs(5),
        ..CheckOptions::default()
    };
    let mut checker = VisibilityChecker::new(&mut sessions, &client, options);
    let started = Instant::now();
    let (records, _) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["solo".to_string()],
            &[PlatformIdentity::WebSearch],
        )
        .await;
    assert_eq!(records.len(), 1);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "first query should start immediately, took {:?}",
        started.elapsed()
    );

    // Consecutive queries wait the configured delay in between.
    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    let options = CheckOptions {
        inter_query_delay: Duration::from_millis(200),
        ..CheckOptions::default()
    };
    let mut checker = VisibilityChecker::new(&mut sessions, &client, options);
    let started = Instant::now();
    let (records, _) = checker
        .check_visibility(
            "AIO Search",
            &[],
            &["first".to_string(), "second".to_string()],
            &[PlatformIdentity::WebSearch],
        )
        .await;
    assert_eq!(records.len(), 2);
    assert!(
        started.elapsed() >= Duration::from_millis(200),
        "expected an inter-query pause, took {:?}",
        started.elapsed()
    );
}
