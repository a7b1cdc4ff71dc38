//! Provider feed fetching with a single Google → Bing fallback.
//!
//! The fetcher tries Google News RSS first, asking it for the last 14 days
//! only. Google answers blocked or rate-limited clients with an HTML page and a
//! 200 status, so a body without an `<rss` marker counts as a failure just like
//! a transport error or a non-success status. On any primary failure Bing News
//! RSS is tried exactly once. There is no backoff and no further retry.
//!
//! # Architecture
//!
//! - [`Transport`]: the HTTP seam; [`HttpTransport`] is the `reqwest` implementation
//! - [`FeedFetcher`]: runs the two-step attempt over any transport
//! - [`FetchOutcome`]: tagged result naming the provider that answered

use crate::error::FeedError;
use crate::models::Provider;
use crate::parser::RECENCY_DAYS;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Browser user-agent sent to both providers.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Per-request timeout for both providers.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const RSS_MARKER: &[u8] = b"<rss";

/// Status and body of a completed HTTP GET.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing the GET requests a fetch needs.
///
/// Implementors must apply the user-agent and timeout policy themselves.
pub trait Transport {
    /// Fetch `url`. Transport-level failures (DNS, TLS, timeout) are errors;
    /// any HTTP status is a successful response.
    async fn get(&self, url: &Url) -> Result<TransportResponse, Box<dyn Error + Send + Sync>>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(host = url.host_str().unwrap_or_default()))]
    async fn get(&self, url: &Url) -> Result<TransportResponse, Box<dyn Error + Send + Sync>> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(TransportResponse { status, body })
    }
}

/// Result of the primary/secondary attempt sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A usable body and the provider that supplied it.
    Fetched { body: Vec<u8>, provider: Provider },
    /// Both providers failed.
    Failed,
}

/// Build the RSS search URL for `query` on `provider`.
///
/// Google gets the `when:14d` recency directive and US/English locale
/// parameters; Bing does not understand the directive, so it gets the bare
/// query.
pub fn search_url(provider: Provider, query: &str) -> Result<Url, FeedError> {
    let raw = match provider {
        Provider::GoogleNews => {
            let query = format!("{query} when:{RECENCY_DAYS}d");
            format!(
                "https://news.google.com/rss/search?q={}&hl=en-US&gl=US&ceid=US:en",
                urlencoding::encode(&query)
            )
        }
        Provider::BingNews => format!(
            "https://www.bing.com/news/search?q={}&format=rss",
            urlencoding::encode(query)
        ),
    };
    Ok(Url::parse(&raw)?)
}

fn has_rss_marker(body: &[u8]) -> bool {
    body.windows(RSS_MARKER.len()).any(|w| w == RSS_MARKER)
}

/// Fetches a query's feed, falling back from Google News to Bing News once.
#[derive(Debug)]
pub struct FeedFetcher<T> {
    transport: T,
}

impl<T> FeedFetcher<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the feed for `query`.
    ///
    /// # Returns
    ///
    /// [`FetchOutcome::Fetched`] with the first usable body, or
    /// [`FetchOutcome::Failed`] once Bing has also failed.
    #[instrument(level = "info", skip_all, fields(query = %truncate_for_log(query, 80)))]
    pub async fn fetch(&self, query: &str) -> FetchOutcome {
        match self.attempt(Provider::GoogleNews, query).await {
            Ok(body) => {
                info!(provider = "google_news", bytes = body.len(), "Fetched feed");
                return FetchOutcome::Fetched {
                    body,
                    provider: Provider::GoogleNews,
                };
            }
            Err(e) => warn!(error = %e, "Google News unusable; falling back to Bing News"),
        }

        match self.attempt(Provider::BingNews, query).await {
            Ok(body) => {
                info!(provider = "bing_news", bytes = body.len(), "Fetched feed");
                FetchOutcome::Fetched {
                    body,
                    provider: Provider::BingNews,
                }
            }
            Err(e) => {
                error!(error = %e, "Bing News fallback failed");
                FetchOutcome::Failed
            }
        }
    }

    async fn attempt(
        &self,
        provider: Provider,
        query: &str,
    ) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        let url = search_url(provider, query)?;
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(format!("{} returned HTTP {}", provider.name(), response.status).into());
        }
        // Only Google serves block pages with a success status.
        if provider == Provider::GoogleNews && !has_rss_marker(&response.body) {
            let preview = String::from_utf8_lossy(&response.body);
            return Err(format!(
                "{} body is not RSS: {}",
                provider.name(),
                truncate_for_log(&preview, 120)
            )
            .into());
        }
        Ok(response.body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned answer for one provider.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Ok(u16, String),
        Unreachable,
    }

    /// In-memory [`Transport`] that answers by host and records every URL.
    #[derive(Debug)]
    pub struct FakeTransport {
        google: Mutex<Reply>,
        bing: Mutex<Reply>,
        pub calls: Mutex<Vec<String>>,
        count: AtomicUsize,
    }

    impl FakeTransport {
        pub fn new(google: Reply, bing: Reply) -> Self {
            Self {
                google: Mutex::new(google),
                bing: Mutex::new(bing),
                calls: Mutex::new(Vec::new()),
                count: AtomicUsize::new(0),
            }
        }

        pub fn set_google(&self, reply: Reply) {
            *self.google.lock().unwrap() = reply;
        }

        pub fn call_count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        pub fn hosts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|u| Url::parse(u).unwrap().host_str().unwrap().to_string())
                .collect()
        }
    }

    impl Transport for FakeTransport {
        async fn get(&self, url: &Url) -> Result<TransportResponse, Box<dyn Error + Send + Sync>> {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(url.to_string());
            let reply = if url.host_str() == Some("news.google.com") {
                self.google.lock().unwrap().clone()
            } else {
                self.bing.lock().unwrap().clone()
            };
            match reply {
                Reply::Ok(status, body) => Ok(TransportResponse {
                    status,
                    body: body.into_bytes(),
                }),
                Reply::Unreachable => Err("connection refused".into()),
            }
        }
    }
}
