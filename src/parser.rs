//! RSS feed parsing and headline filtering.
//!
//! Turns a provider's raw RSS body into the [`ArticleRecord`]s shown on a
//! topic tab. Provider-side recency hints are not trusted: every item is
//! checked again against a 14-day cutoff, and topics with mandatory headline
//! keywords drop items whose title does not name one of them.
//!
//! # Source attribution
//!
//! Google News appends the publisher to the headline (`Headline - Publisher`),
//! so the publisher is split off the last `" - "`. Bing News items may carry an
//! explicit `<source>` element, which wins over the split. A headline that
//! legitimately contains `" - "` will be split wrongly; this is accepted.

use crate::error::FeedError;
use crate::models::{ArticleRecord, FetchResult, Provider};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Trailing window, in days, an article's publication date must fall in.
pub const RECENCY_DAYS: i64 = 14;

const NO_TITLE: &str = "No Title";
const NO_LINK: &str = "#";
const NO_DATE: &str = "Recent";
const DEFAULT_SOURCE: &str = "Industry News";
const SOURCE_SEPARATOR: &str = " - ";
const RAW_DATE_CHARS: usize = 16;

#[derive(Debug, Deserialize)]
struct Rss {
    #[serde(default)]
    channel: Option<Channel>,
}

#[derive(Debug, Default, Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default)]
    source: Option<SourceElement>,
}

#[derive(Debug, Deserialize)]
struct SourceElement {
    #[serde(default, rename = "$text")]
    name: Option<String>,
}

/// Parse a provider feed into at most `limit` accepted articles.
///
/// # Arguments
///
/// * `xml` - Raw response body
/// * `provider` - Which endpoint produced the body; decides source attribution
/// * `mandatory_title_keywords` - Lowercase substrings, one of which must be in the headline
/// * `limit` - Maximum number of accepted articles
/// * `now` - Evaluation time the 14-day cutoff is measured from
///
/// # Returns
///
/// [`FetchResult::Articles`] in document order (possibly empty), or
/// [`FetchResult::Failed`] carrying the XML parser's message when the body is
/// not well-formed.
#[instrument(level = "info", skip(xml, mandatory_title_keywords, provider), fields(provider = provider.name(), bytes = xml.len()))]
pub fn parse_feed(
    xml: &[u8],
    provider: Provider,
    mandatory_title_keywords: Option<&[String]>,
    limit: usize,
    now: DateTime<Utc>,
) -> FetchResult {
    let items = match read_items(xml) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Feed body is not valid XML");
            return FetchResult::Failed(e.to_string());
        }
    };

    let cutoff = now - Duration::days(RECENCY_DAYS);
    let total = items.len();
    let mut articles = Vec::new();
    let mut off_topic = 0usize;
    let mut stale = 0usize;

    for item in items {
        if articles.len() >= limit {
            break;
        }

        let raw_title = non_empty(item.title).unwrap_or_else(|| NO_TITLE.to_string());
        let link = non_empty(item.link).unwrap_or_else(|| NO_LINK.to_string());
        let title = clean_title(&raw_title);

        if let Some(keywords) = mandatory_title_keywords {
            if !headline_matches(&title, keywords) {
                off_topic += 1;
                debug!(%title, "Headline lacks mandatory keyword; skipping");
                continue;
            }
        }

        let published_at = match non_empty(item.pub_date) {
            Some(raw) => match parse_pub_date(&raw) {
                Some(dt) if dt < cutoff => {
                    stale += 1;
                    debug!(%title, published = %dt, %cutoff, "Older than recency cutoff; skipping");
                    continue;
                }
                Some(dt) => dt.format("%b %d, %Y").to_string(),
                None => {
                    debug!(%title, raw_date = %raw, "Unparseable pubDate; keeping raw text");
                    raw.chars().take(RAW_DATE_CHARS).collect()
                }
            },
            None => NO_DATE.to_string(),
        };

        let explicit_source = item.source.and_then(|s| non_empty(s.name));
        let (title, source) = attribute_source(&title, provider, explicit_source.as_deref());

        articles.push(ArticleRecord {
            title: title.trim().to_string(),
            link,
            published_at,
            source: source.trim().to_string(),
        });
    }

    info!(
        items = total,
        accepted = articles.len(),
        off_topic,
        stale,
        limit,
        "Parsed feed"
    );
    FetchResult::Articles(articles)
}

fn read_items(xml: &[u8]) -> Result<Vec<Item>, FeedError> {
    let rss: Rss = quick_xml::de::from_reader(xml)?;
    Ok(rss.channel.unwrap_or_default().items)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Decode HTML entities and swap square brackets for parentheses so the
/// headline can sit inside a Markdown link label.
pub fn clean_title(raw: &str) -> String {
    html_escape::decode_html_entities(raw)
        .replace('[', "(")
        .replace(']', ")")
}

/// True when the lowercased headline contains at least one keyword.
pub fn headline_matches(title: &str, keywords: &[String]) -> bool {
    let lower = title.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Parse an RFC 2822 `pubDate` into UTC.
///
/// The leading weekday is ignored, even when it disagrees with the date.
/// Dates with no zone, or a zone name that is not recognised, are taken as UTC.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let date = strip_weekday(raw.trim());
    if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        return Some(dt.with_timezone(&Utc));
    }

    let zoneless = match date.rsplit_once(' ') {
        Some((rest, zone)) if zone.chars().all(|c| c.is_ascii_alphabetic()) => rest,
        _ => date,
    };
    ["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(zoneless, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn strip_weekday(date: &str) -> &str {
    match date.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => date,
    }
}

/// Pick the publisher for a headline, returning `(title, source)`.
pub fn attribute_source<'a>(
    title: &'a str,
    provider: Provider,
    explicit_source: Option<&'a str>,
) -> (&'a str, &'a str) {
    if provider == Provider::BingNews {
        if let Some(source) = explicit_source {
            return (title, source);
        }
    }
    title
        .rsplit_once(SOURCE_SEPARATOR)
        .unwrap_or((title, DEFAULT_SOURCE))
}
