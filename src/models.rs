//! Data models shared by the fetch, parse and render stages.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One normalized headline parsed from a provider feed
//! - [`QuerySpec`]: Everything needed to compute one topic's feed (also the cache key)
//! - [`FetchResult`]: The discriminated outcome of a topic scan
//! - [`Provider`]: Which news search endpoint supplied a feed
//! - [`RadarReport`] / [`TopicFeed`]: The rendered shape of a whole scan

use serde::{Deserialize, Serialize};

/// Static user-facing message used when neither provider could be reached.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load feeds.";

/// A single headline as it will be shown to the reader.
///
/// Records are built by the feed parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// HTML-unescaped headline with square brackets swapped for parentheses.
    pub title: String,
    /// Article URL, or `#` when the item carried none.
    pub link: String,
    /// `Mon DD, YYYY`, the truncated raw date, or `Recent`.
    pub published_at: String,
    /// Publisher attribution.
    pub source: String,
}

/// The news search endpoint a feed body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    /// Google News RSS search. Supports the `when:` recency directive.
    GoogleNews,
    /// Bing News RSS search. Used only as a fallback.
    BingNews,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::GoogleNews => "google_news",
            Provider::BingNews => "bing_news",
        }
    }
}

/// Inputs for one topic scan.
///
/// Two scans with equal specs are interchangeable, which is what lets the
/// spec serve as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    /// Boolean search string sent to the providers.
    pub query: String,
    /// Lowercase substrings of which at least one must appear in a headline.
    pub mandatory_title_keywords: Option<Vec<String>>,
    /// Maximum number of accepted articles.
    pub limit: usize,
}

/// Outcome of scanning one topic: either articles (possibly none) or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Articles(Vec<ArticleRecord>),
    Failed(String),
}

impl FetchResult {
    pub fn articles(&self) -> Option<&[ArticleRecord]> {
        match self {
            FetchResult::Articles(articles) => Some(articles),
            FetchResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchResult::Articles(_) => None,
            FetchResult::Failed(message) => Some(message),
        }
    }

    /// Split into the `(articles, error)` pair handed to the renderers.
    /// Exactly one side is populated.
    pub fn into_parts(self) -> (Option<Vec<ArticleRecord>>, Option<String>) {
        match self {
            FetchResult::Articles(articles) => (Some(articles), None),
            FetchResult::Failed(message) => (None, Some(message)),
        }
    }
}

/// One rendered tab of the radar.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicFeed {
    pub slug: String,
    pub label: String,
    pub heading: String,
    pub description: String,
    pub articles: Option<Vec<ArticleRecord>>,
    pub error: Option<String>,
}

/// All topics from one scan, stamped with the local sync time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadarReport {
    /// Radar title, e.g. "🚛 Class 7 & 8 Fleet Radar".
    pub title: String,
    /// One-line description shown under the title.
    pub tagline: String,
    /// The date of the scan in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Wall-clock time of the scan in `HH:MM AM` format.
    pub local_time: String,
    pub topics: Vec<TopicFeed>,
}
