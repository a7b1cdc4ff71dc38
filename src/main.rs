//! # Fleet Radar
//!
//! A news radar for the heavy-duty trucking industry. It searches Google News
//! RSS (falling back to Bing News RSS) for Class 7/8 fleet news, fleet M&A and
//! bankruptcies, Class 8 OEMs and commercial tire suppliers, keeps only the
//! last 14 days of relevant headlines, and prints them as a categorized feed.
//!
//! ## Usage
//!
//! ```sh
//! fleet_radar                       # print all topics as Markdown
//! fleet_radar -t mergers -j ./json  # one topic, also saved as JSON
//! fleet_radar --interactive         # keep the radar open, refresh on demand
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Query building**: Turn each topic's keyword groups into a boolean search
//! 2. **Fetching**: Google News RSS, then Bing News RSS once if Google is unusable
//! 3. **Parsing**: Recency cutoff, headline keyword filter, source attribution
//! 4. **Output**: Markdown to stdout, optional JSON and Markdown files
//!
//! Parsed topics are cached for `--cache-ttl-secs`; the interactive `refresh`
//! command clears the cache.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod parser;
mod query;
mod radar;
mod utils;

use cache::FeedCache;
use cli::{Cli, PromptAction};
use config::RadarConfig;
use fetcher::{FeedFetcher, HttpTransport, Transport};
use outputs::{json, markdown};
use radar::{Radar, build_report};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr; stdout carries the feed.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fleet_radar starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = RadarConfig::load(args.config.as_deref())?;

    // Early check: output dirs must be writable before any network work
    for dir in [&args.json_output_dir, &args.markdown_output_dir]
        .into_iter()
        .flatten()
    {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable (fix perms or choose a different path)");
            return Err(e);
        }
    }

    let unknown: Vec<&String> = args
        .topics
        .iter()
        .filter(|slug| !config.topics.iter().any(|t| &t.slug == *slug))
        .collect();
    if !unknown.is_empty() {
        warn!(?unknown, "Ignoring unknown topic slugs");
    }

    let cache = FeedCache::new(Duration::from_secs(args.cache_ttl_secs.max(1)));
    info!(ttl = ?cache.ttl(), topics = config.topics.len(), "Radar ready");
    let radar = Radar::new(FeedFetcher::new(HttpTransport::new()?), cache);

    run_cycle(&radar, &config, &args).await?;

    if args.interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt().await?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match PromptAction::parse(&line) {
                Some(PromptAction::Quit) => break,
                Some(PromptAction::Refresh) => {
                    radar.refresh();
                    run_cycle(&radar, &config, &args).await?;
                }
                Some(PromptAction::Rescan) => run_cycle(&radar, &config, &args).await?,
                None => warn!(%line, "Unknown command; use [Enter] to rescan, r to refresh, q to quit"),
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Scan, print and optionally persist one render cycle.
#[instrument(level = "info", skip_all)]
async fn run_cycle<T: Transport>(
    radar: &Radar<T>,
    config: &RadarConfig,
    args: &Cli,
) -> Result<(), Box<dyn Error>> {
    let topics = radar.scan(config, &args.topics).await;
    let report = build_report(config, topics);

    let failed = report.topics.iter().filter(|t| t.error.is_some()).count();
    let articles: usize = report
        .topics
        .iter()
        .filter_map(|t| t.articles.as_ref())
        .map(Vec::len)
        .sum();
    info!(topics = report.topics.len(), articles, failed, "Scan complete");

    let md = markdown::report_to_markdown(&report);
    let mut stdout = tokio::io::stdout();
    stdout.write_all(md.as_bytes()).await?;
    stdout.flush().await?;

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_report(&report, dir).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }
    if let Some(dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_markdown(&report, dir).await {
            error!(error = %e, "Failed to write Markdown report");
        }
    }

    Ok(())
}

async fn prompt() -> Result<(), Box<dyn Error>> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"\n[Enter] rescan | r refresh | q quit > ")
        .await?;
    stdout.flush().await?;
    Ok(())
}
