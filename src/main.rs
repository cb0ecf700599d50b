//! CLI entry point for the moisture rater.
//!
//! Provides subcommands for averaging soil-moisture CSV readings and for
//! replaying tracker operation scripts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use moisture_rater::{
    averager::summarize_bytes,
    fetch::{ApiKey, BasicClient, HttpClient, load_source},
    ops::{apply_ops, parse_ops},
    output::{append_averages, append_summary, print_json, print_pretty},
    tracker::ValueTracker,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "moisture_rater")]
#[command(about = "Average soil-moisture readings and track values by id", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-id and overall averages from `id,timestamp,value` CSV
    Average {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append results to
        #[arg(short, long)]
        output: Option<String>,

        /// Also log the full parse report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a JSON operation script against a fresh tracker
    Track {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append the summary to
        #[arg(short, long)]
        output: Option<String>,

        /// Also log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = init_logging()?;

    let cli = Cli::parse();

    let basic = BasicClient::new();
    match std::env::var("MOISTURE_RATER_TOKEN") {
        Ok(token) => {
            let header = std::env::var("MOISTURE_RATER_TOKEN_HEADER").ok();
            let client = ApiKey::from_token(basic, &token, header.as_deref())?;
            run(cli.command, &client).await
        }
        Err(_) => run(cli.command, &basic).await,
    }
}

/// Human-readable events on stderr, JSON events in `$LOG_DIR/moisture_rater.<date>.log`.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("moisture_rater")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let file = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}

async fn run<C: HttpClient>(command: Commands, client: &C) -> Result<()> {
    match command {
        Commands::Average {
            source,
            output,
            json,
        } => average(client, &source, output.as_deref(), json).await,
        Commands::Track {
            source,
            output,
            json,
        } => track(client, &source, output.as_deref(), json).await,
    }
}

#[tracing::instrument(skip(client))]
async fn average<C: HttpClient>(
    client: &C,
    source: &str,
    output: Option<&str>,
    json: bool,
) -> Result<()> {
    let bytes = load_source(client, source).await?;
    let report = summarize_bytes(&bytes)?;

    if !report.skipped.is_empty() {
        warn!(skipped = report.skipped.len(), "Some rows were skipped");
    }

    let mut keys: Vec<_> = report.averages.per_key.iter().collect();
    keys.sort_by(|a, b| a.0.cmp(b.0));
    for (key, average) in keys {
        info!(key = %key, average, count = report.per_key_counts[key], "Per-key average");
    }
    info!(
        overall = report.averages.overall,
        accepted = report.accepted,
        "Overall average"
    );

    print_pretty(&report);
    if json {
        print_json(&report)?;
    }
    if let Some(path) = output {
        append_averages(path, source, &report.averages)?;
    }

    Ok(())
}

#[tracing::instrument(skip(client))]
async fn track<C: HttpClient>(
    client: &C,
    source: &str,
    output: Option<&str>,
    json: bool,
) -> Result<()> {
    let bytes = load_source(client, source).await?;
    let ops = parse_ops(&bytes)?;

    let mut tracker = ValueTracker::new();
    apply_ops(&mut tracker, &ops)?;

    let summary = tracker.summary();
    match summary.average {
        Some(avg) => info!(count = summary.count, avg, "Tracker summary"),
        None => info!(count = summary.count, "Tracker summary: nothing tracked"),
    }

    if json {
        print_json(&summary)?;
    }
    if let Some(path) = output {
        append_summary(path, source, &summary)?;
    }

    Ok(())
}
