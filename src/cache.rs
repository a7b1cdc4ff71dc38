//! Time-to-live cache of parsed topic feeds.
//!
//! Owned by the caller and handed to the [`Radar`](crate::radar::Radar), so the
//! pipeline itself never touches global state. Only successful results are
//! stored: a provider outage is retried on the next scan instead of being
//! pinned for the whole TTL. Two concurrent misses for the same spec may both
//! compute; the later insert wins.

use crate::models::{ArticleRecord, FetchResult, QuerySpec};
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default lifetime of a cached feed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

const MAX_ENTRIES: u64 = 256;

#[derive(Debug, Clone)]
pub struct FeedCache {
    inner: Cache<QuerySpec, Arc<Vec<ArticleRecord>>>,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { inner, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, spec: &QuerySpec) -> Option<Vec<ArticleRecord>> {
        self.inner.get(spec).await.map(|articles| articles.as_ref().clone())
    }

    pub async fn insert(&self, spec: QuerySpec, articles: Vec<ArticleRecord>) {
        self.inner.insert(spec, Arc::new(articles)).await;
    }

    /// Return the cached articles for `spec`, or run `compute` and cache its
    /// result if it succeeded.
    pub async fn get_or_compute<F, Fut>(&self, spec: &QuerySpec, compute: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult>,
    {
        if let Some(articles) = self.get(spec).await {
            debug!(count = articles.len(), "Cache hit");
            return FetchResult::Articles(articles);
        }

        let result = compute().await;
        if let FetchResult::Articles(articles) = &result {
            self.insert(spec.clone(), articles.clone()).await;
        }
        result
    }

    /// Drop every cached feed; the next lookup for any spec recomputes.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        info!("Feed cache cleared");
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spec(query: &str) -> QuerySpec {
        QuerySpec {
            query: query.to_string(),
            mandatory_title_keywords: None,
            limit: 20,
        }
    }

    fn article(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            link: "#".to_string(),
            published_at: "Recent".to_string(),
            source: "Industry News".to_string(),
        }
    }

    #[tokio::test]
    async fn test_hit_skips_compute() {
        let cache = FeedCache::default();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let compute = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            FetchResult::Articles(vec![article("Cached")])
        };

        let first = cache.get_or_compute(&spec("fleet"), compute).await;
        let second = cache.get_or_compute(&spec("fleet"), compute).await;

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = FeedCache::default();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let compute = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            FetchResult::Failed("Failed to load feeds.".to_string())
        };

        cache.get_or_compute(&spec("fleet"), compute).await;
        cache.get_or_compute(&spec("fleet"), compute).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(cache.get(&spec("fleet")).await.is_none());
    }

    #[tokio::test]
    async fn test_keys_include_filter_arguments() {
        let cache = FeedCache::default();
        cache.insert(spec("fleet"), vec![article("A")]).await;

        let mut filtered = spec("fleet");
        filtered.mandatory_title_keywords = Some(vec!["merger".to_string()]);
        assert!(cache.get(&filtered).await.is_none());

        let mut capped = spec("fleet");
        capped.limit = 15;
        assert!(cache.get(&capped).await.is_none());
        assert!(cache.get(&spec("fleet")).await.is_some());
    }

    #[tokio::test]
    async fn test_clear_forces_recompute() {
        let cache = FeedCache::default();
        cache.insert(spec("fleet"), vec![article("A")]).await;
        cache.insert(spec("tires"), vec![article("B")]).await;

        cache.clear();

        assert!(cache.get(&spec("fleet")).await.is_none());
        assert!(cache.get(&spec("tires")).await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = FeedCache::new(Duration::from_millis(100));
        cache.insert(spec("fleet"), vec![article("A")]).await;
        assert!(cache.get(&spec("fleet")).await.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(cache.get(&spec("fleet")).await.is_none());
    }
}
