//! Visibility check command handler.
//!
//! Called from `main` after configuration is loaded. Fatal setup failures
//! (watchlist load, automation init, export I/O) propagate; per-query
//! failures are recorded by the checker and show up in the output table
//! instead of aborting the run.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;

use aivis_checker::{
    write_records_csv, CheckOptions, VisibilityChecker, VisibilityRecord, VisibilitySummary,
};
use aivis_core::{load_watchlist, AppConfig, PlatformIdentity, Watchlist};
use aivis_platform::{PlatformClient, ScriptedAuthProvider, SessionManager};

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    /// Watchlist file to check (defaults to the configured path).
    #[arg(long, value_name = "PATH")]
    watchlist: Option<PathBuf>,

    /// Override the watchlist brand.
    #[arg(long)]
    brand: Option<String>,

    /// Override the watchlist competitors (repeatable).
    #[arg(long = "competitor", value_name = "NAME")]
    competitors: Vec<String>,

    /// Override the watchlist prompts (repeatable).
    #[arg(long = "prompt", value_name = "TEXT")]
    prompts: Vec<String>,

    /// Override the watchlist platforms (repeatable).
    #[arg(long = "platform", value_name = "NAME")]
    platforms: Vec<PlatformIdentity>,

    /// Skip the CSV export.
    #[arg(long)]
    no_export: bool,

    /// Override the inter-query delay in milliseconds.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
}

/// Run one visibility check: authenticate what needs login, fan the prompts
/// across the platforms, print the per-record table and summary, and export
/// CSV unless `--no-export`.
///
/// # Errors
///
/// Returns an error if the watchlist cannot be loaded or is invalid after
/// overrides, the automation provider fails to start, the HTTP client cannot
/// be built, or the export cannot be written. Per-query and per-platform
/// login failures are logged and recorded, not propagated.
pub(crate) async fn run_check(config: &AppConfig, args: CheckArgs) -> anyhow::Result<()> {
    let watchlist = resolve_watchlist(config, &args)?;

    let mut sessions = SessionManager::new(ScriptedAuthProvider::new());
    sessions
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!("automation provider failed to start: {e}"))?;

    let needs_auth: Vec<PlatformIdentity> = watchlist
        .platforms
        .iter()
        .copied()
        .filter(|p| p.requires_auth())
        .collect();
    if !needs_auth.is_empty() {
        if let Some(credentials) = config.credentials() {
            for platform in needs_auth {
                sessions.authenticate(platform, &credentials).await;
            }
        } else {
            tracing::warn!(
                "LLM_EMAIL / LLM_PASSWORD are not set; login-gated platforms will be skipped"
            );
        }
    }

    let client = PlatformClient::new(config.query_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build platform client: {e}"))?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current query");
            interrupt.cancel();
        }
    });

    let delay_ms = args.delay_ms.unwrap_or(config.inter_query_delay_ms);
    let options = CheckOptions {
        inter_query_delay: Duration::from_millis(delay_ms),
        query_timeout: Duration::from_secs(config.query_timeout_secs),
        enable_web_search: config.enable_web_search,
        cancel: Some(cancel),
    };

    let mut checker = VisibilityChecker::new(&mut sessions, &client, options);
    let (records, summary) = checker
        .check_visibility(
            &watchlist.brand,
            &watchlist.competitors,
            &watchlist.prompts,
            &watchlist.platforms,
        )
        .await;

    print_records(&records);
    print_summary(&summary);

    let mut export_outcome: anyhow::Result<()> = Ok(());
    if !args.no_export {
        match write_records_csv(&config.export_dir, &records) {
            Ok(path) => println!("results written to {}", path.display()),
            Err(e) => export_outcome = Err(anyhow::anyhow!("export failed: {e}")),
        }
    }

    sessions.cleanup().await;
    export_outcome
}

/// Load the watchlist and apply any CLI overrides, re-validating the result.
fn resolve_watchlist(config: &AppConfig, args: &CheckArgs) -> anyhow::Result<Watchlist> {
    let path = args
        .watchlist
        .clone()
        .unwrap_or_else(|| config.watchlist_path.clone());
    let mut watchlist = load_watchlist(&path)
        .map_err(|e| anyhow::anyhow!("failed to load watchlist {}: {e}", path.display()))?;

    if let Some(brand) = &args.brand {
        watchlist.brand.clone_from(brand);
    }
    if !args.competitors.is_empty() {
        watchlist.competitors.clone_from(&args.competitors);
    }
    if !args.prompts.is_empty() {
        watchlist.prompts.clone_from(&args.prompts);
    }
    if !args.platforms.is_empty() {
        watchlist.platforms.clone_from(&args.platforms);
    }

    aivis_core::watchlist::validate_watchlist(&watchlist)
        .map_err(|e| anyhow::anyhow!("invalid watchlist after overrides: {e}"))?;
    Ok(watchlist)
}

fn print_records(records: &[VisibilityRecord]) {
    println!(
        "{:<12} {:<8} {:<10} {:<9} {:>8}  prompt",
        "platform", "success", "mention", "sentiment", "time"
    );
    for record in records {
        println!(
            "{:<12} {:<8} {:<10} {:<9} {:>7.3}s  {}",
            record.platform.as_str(),
            record.result.success,
            record.mentions.mention_type.as_str(),
            record.mentions.sentiment.as_str(),
            record.result.latency.as_secs_f64(),
            record.prompt
        );
    }
}

fn print_summary(summary: &VisibilitySummary) {
    println!();
    println!(
        "queries:        {} total, {} successful",
        summary.total_queries, summary.successful_queries
    );
    println!(
        "brand mentions: {} ({:.0}% of successful)",
        summary.brand_mentions,
        summary.mention_rate * 100.0
    );
    println!(
        "avg response:   {:.3}s",
        summary.average_response_time.as_secs_f64()
    );
}
