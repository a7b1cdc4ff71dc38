//! The fetch-parse-filter pipeline, one topic at a time or a whole radar.

use crate::cache::FeedCache;
use crate::config::{RadarConfig, Topic};
use crate::fetcher::{FeedFetcher, FetchOutcome, Transport};
use crate::models::{FETCH_FAILED_MESSAGE, FetchResult, QuerySpec, RadarReport, TopicFeed};
use crate::parser::parse_feed;
use chrono::{Local, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

/// Upper bound on topics scanned at the same time.
const MAX_CONCURRENT_TOPICS: usize = 4;

/// Runs topic scans against a fetcher, consulting a caller-owned cache first.
#[derive(Debug)]
pub struct Radar<T> {
    fetcher: FeedFetcher<T>,
    cache: FeedCache,
}

impl<T> Radar<T>
where
    T: Transport,
{
    pub fn new(fetcher: FeedFetcher<T>, cache: FeedCache) -> Self {
        Self { fetcher, cache }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &FeedFetcher<T> {
        &self.fetcher
    }

    /// Scan one topic, served from the cache while its entry is fresh.
    #[instrument(level = "info", skip_all, fields(limit = spec.limit, filtered = spec.mandatory_title_keywords.is_some()))]
    pub async fn topic_feed(&self, spec: &QuerySpec) -> FetchResult {
        self.cache
            .get_or_compute(spec, || self.compute(spec))
            .await
    }

    async fn compute(&self, spec: &QuerySpec) -> FetchResult {
        match self.fetcher.fetch(&spec.query).await {
            FetchOutcome::Fetched { body, provider } => parse_feed(
                &body,
                provider,
                spec.mandatory_title_keywords.as_deref(),
                spec.limit,
                Utc::now(),
            ),
            FetchOutcome::Failed => FetchResult::Failed(FETCH_FAILED_MESSAGE.to_string()),
        }
    }

    /// Scan every topic selected by `only` (all when empty).
    ///
    /// Topics run concurrently; the output keeps configuration order.
    #[instrument(level = "info", skip_all, fields(only = ?only))]
    pub async fn scan(&self, config: &RadarConfig, only: &[String]) -> Vec<TopicFeed> {
        let topics = config.select(only);
        info!(topics = topics.len(), "Scanning topics");

        stream::iter(topics)
            .map(|topic| async move {
                let spec = topic.query_spec(&config.negatives);
                let result = self.topic_feed(&spec).await;
                to_topic_feed(topic, result)
            })
            .buffered(MAX_CONCURRENT_TOPICS)
            .collect()
            .await
    }

    /// Forget every cached feed so the next scan goes back to the providers.
    pub fn refresh(&self) {
        self.cache.clear();
    }
}

fn to_topic_feed(topic: &Topic, result: FetchResult) -> TopicFeed {
    let (articles, error) = result.into_parts();
    TopicFeed {
        slug: topic.slug.clone(),
        label: topic.label.clone(),
        heading: topic.heading.clone(),
        description: topic.description.clone(),
        articles,
        error,
    }
}

/// Stamp a finished scan with the local sync time.
pub fn build_report(config: &RadarConfig, topics: Vec<TopicFeed>) -> RadarReport {
    let now = Local::now();
    RadarReport {
        title: config.title.clone(),
        tagline: config.tagline.clone(),
        local_date: now.date_naive().to_string(),
        local_time: now.format("%I:%M %p").to_string(),
        topics,
    }
}
