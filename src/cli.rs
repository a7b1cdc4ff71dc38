//! Command-line interface definitions for Fleet Radar.
//!
//! This module defines the CLI arguments and options using the `clap` crate,
//! plus the tiny command language of the interactive refresh prompt.

use clap::Parser;

/// Command-line arguments for the Fleet Radar application.
///
/// # Examples
///
/// ```sh
/// # Print every built-in topic as Markdown
/// fleet_radar
///
/// # Only the M&A and tire tabs, also written to disk
/// fleet_radar -t mergers -t tires -j ./json -m ./markdown
///
/// # Keep the process open and refresh on demand
/// fleet_radar --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a topics YAML file (defaults to the built-in trucking topics)
    #[arg(short, long, env = "RADAR_CONFIG")]
    pub config: Option<String>,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Only scan the topics with these slugs (repeatable)
    #[arg(short, long = "topic")]
    pub topics: Vec<String>,

    /// Seconds a scanned topic stays cached before it is fetched again
    #[arg(long, env = "RADAR_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Stay open after the first scan and wait for refresh commands
    #[arg(short, long)]
    pub interactive: bool,
}

/// A command typed at the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Scan again; fresh cache entries are reused.
    Rescan,
    /// Clear the cache, then scan again.
    Refresh,
    Quit,
}

impl PromptAction {
    /// Parse one prompt line. An empty line rescans.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "s" | "scan" => Some(PromptAction::Rescan),
            "r" | "refresh" => Some(PromptAction::Refresh),
            "q" | "quit" | "exit" => Some(PromptAction::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["fleet_radar"]);
        assert!(cli.json_output_dir.is_none());
        assert!(cli.markdown_output_dir.is_none());
        assert!(cli.topics.is_empty());
        assert!(!cli.interactive);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "fleet_radar",
            "-j",
            "/tmp/json",
            "-m",
            "/tmp/markdown",
            "-t",
            "mergers",
            "-t",
            "tires",
            "-i",
        ]);

        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert_eq!(cli.markdown_output_dir.as_deref(), Some("/tmp/markdown"));
        assert_eq!(cli.topics, vec!["mergers", "tires"]);
        assert!(cli.interactive);
    }

    #[test]
    fn test_cli_cache_ttl() {
        let cli = Cli::parse_from(["fleet_radar", "--cache-ttl-secs", "60"]);
        assert_eq!(cli.cache_ttl_secs, 60);
    }

    #[test]
    fn test_prompt_actions() {
        assert_eq!(PromptAction::parse(""), Some(PromptAction::Rescan));
        assert_eq!(PromptAction::parse(" R \n"), Some(PromptAction::Refresh));
        assert_eq!(PromptAction::parse("refresh"), Some(PromptAction::Refresh));
        assert_eq!(PromptAction::parse("q"), Some(PromptAction::Quit));
        assert_eq!(PromptAction::parse("bogus"), None);
    }
}
