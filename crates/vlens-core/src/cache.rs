use crate::config::HttpConfig;
use crate::error::{HttpError, Result, VlensError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Maximum number of cached entries to prevent unbounded memory growth.
const MAX_CACHE_ENTRIES: usize = 1000;

type FetchResult = std::result::Result<CachedResponse, HttpError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Where a response (or document) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// Fetched over the network for this request
    Remote,
    /// Served from the in-memory response cache
    Cache,
    /// Produced without any HTTP request (local files, short-circuits)
    Local,
}

/// Cached 2xx response.
///
/// The body is wrapped in `Arc` for zero-cost cloning across multiple
/// consumers.
///
/// # Examples
///
/// ```
/// use vlens_core::cache::CachedResponse;
/// use std::sync::Arc;
/// use std::time::Instant;
///
/// let response = CachedResponse {
///     status: 200,
///     body: Arc::new(b"response data".to_vec()),
///     fetched_at: Instant::now(),
/// };
///
/// // Clone is cheap - only increments Arc reference count
/// let cloned = response.clone();
/// assert!(Arc::ptr_eq(&response.body, &cloned.body));
/// ```
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Arc<Vec<u8>>,
    pub fetched_at: Instant,
}

/// Successful response handed to registry clients.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub data: Arc<Vec<u8>>,
    pub source: ResponseSource,
}

impl HttpResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.data)
    }

    fn from_cached(cached: CachedResponse, source: ResponseSource) -> Self {
        Self {
            status: cached.status,
            data: cached.body,
            source,
        }
    }
}

/// Builds the cache key for a request: the URL without trailing `/` or `?`
/// followed by the query parameters sorted by name.
///
/// # Examples
///
/// ```
/// use vlens_core::cache::cache_key;
///
/// let a = cache_key("https://example.com/query/", &[("q", "x"), ("id", "Foo")]);
/// let b = cache_key("https://example.com/query", &[("id", "Foo"), ("q", "x")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "https://example.com/query?id=Foo&q=x");
/// ```
pub fn cache_key(url: &str, query: &[(&str, &str)]) -> String {
    let base = url.trim_end_matches(&['/', '?'][..]);
    if query.is_empty() {
        return base.to_string();
    }

    let mut params = query.to_vec();
    params.sort_unstable();

    let encoded: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();

    format!("{}?{}", base, encoded.join("&"))
}

/// Cache key scoped to the credentials a request is sent with.
///
/// Authenticated requests get a fingerprint of the token appended so feeds
/// that answer per credential never share entries. The token itself never
/// appears in the key.
fn request_key(url: &str, query: &[(&str, &str)], token: Option<&str>) -> String {
    let key = cache_key(url, query);
    match token {
        Some(token) => {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            format!("{key}#auth={:016x}", hasher.finish())
        }
        None => key,
    }
}

/// Pending-registry slot held by one waiter.
///
/// Dropping it, on completion or when the waiter is cancelled, unregisters
/// the fetch it was created for. A fetch nobody awaits any more is dropped
/// with its last waiter, which aborts the underlying request.
struct PendingSlot<'a> {
    pending: &'a DashMap<String, SharedFetch>,
    key: String,
    fetch: SharedFetch,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.pending
            .remove_if(&self.key, |_, pending| pending.ptr_eq(&self.fetch));
    }
}

/// HTTP client with a TTL response cache and in-flight request sharing.
///
/// Successful (2xx) responses are cached for the configured TTL and served
/// without network I/O while fresh. Concurrent requests for the same key
/// while a fetch is outstanding await that single fetch instead of issuing
/// their own; the pending-request registry uses the same keys as the cache.
/// A fetch whose waiters are all cancelled is abandoned and unregistered.
/// Non-2xx responses are never cached.
///
/// Both maps are `DashMap`s, so requests for unrelated keys never contend
/// on a shared lock.
///
/// # Examples
///
/// ```no_run
/// use vlens_core::cache::HttpCache;
/// use vlens_core::config::HttpConfig;
///
/// # async fn example() -> vlens_core::error::Result<()> {
/// let cache = HttpCache::new(&HttpConfig::default())?;
///
/// // First request - fetches from network
/// let first = cache.get("https://registry.npmjs.org/express", &[]).await?;
///
/// // Second request - served from cache while the TTL has not elapsed
/// let second = cache.get("https://registry.npmjs.org/express", &[]).await?;
///
/// assert!(std::sync::Arc::ptr_eq(&first.data, &second.data));
/// # Ok(())
/// # }
/// ```
pub struct HttpCache {
    entries: Arc<DashMap<String, CachedResponse>>,
    pending: DashMap<String, SharedFetch>,
    client: Client,
    ttl: Duration,
}

impl HttpCache {
    /// Creates a new cache from HTTP settings.
    ///
    /// Every request is bounded by `config.timeout_secs`.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| VlensError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            entries: Arc::new(DashMap::new()),
            pending: DashMap::new(),
            client,
            ttl: config.cache_ttl(),
        })
    }

    /// Performs a GET request, consulting the cache first.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<HttpResponse, HttpError> {
        self.get_with_token(url, query, None).await
    }

    /// Performs a GET request with an optional bearer token.
    ///
    /// Responses fetched with different tokens are cached separately.
    ///
    /// # Errors
    ///
    /// - `HttpError::Status` for non-2xx responses (status preserved)
    /// - `HttpError::Timeout` when the request exceeds the configured timeout
    /// - `HttpError::Network` for any other transport failure
    pub async fn get_with_token(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> std::result::Result<HttpResponse, HttpError> {
        let key = request_key(url, query, token);

        if let Some(cached) = self.lookup(&key) {
            tracing::debug!("cache hit: {}", key);
            return Ok(HttpResponse::from_cached(cached, ResponseSource::Cache));
        }

        let fetch = match self.pending.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!("joining in-flight request: {}", key);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                // A fetch for this key may have completed between the
                // lookup above and taking the pending slot.
                if let Some(cached) = self.lookup(&key) {
                    return Ok(HttpResponse::from_cached(cached, ResponseSource::Cache));
                }
                let fetch = self.start_fetch(key.clone(), url, query, token);
                entry.insert(fetch.clone());
                fetch
            }
        };

        let slot = PendingSlot {
            pending: &self.pending,
            key,
            fetch,
        };
        let result = slot.fetch.clone().await;
        drop(slot);

        result.map(|cached| HttpResponse::from_cached(cached, ResponseSource::Remote))
    }

    /// Returns a fresh cached entry, dropping it if the TTL has elapsed.
    fn lookup(&self, key: &str) -> Option<CachedResponse> {
        let cached = self.entries.get(key).map(|entry| entry.value().clone())?;

        if cached.fetched_at.elapsed() < self.ttl {
            return Some(cached);
        }

        let ttl = self.ttl;
        self.entries
            .remove_if(key, |_, entry| entry.fetched_at.elapsed() >= ttl);
        None
    }

    /// Builds the shared network future for a key.
    ///
    /// The future owns everything it needs, so it keeps running while any
    /// waiter for the key is still awaiting it.
    fn start_fetch(
        &self,
        key: String,
        url: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> SharedFetch {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let entries = Arc::clone(&self.entries);
        let ttl = self.ttl;
        let url = url.to_string();

        async move {
            tracing::debug!("fetching fresh: {}", key);

            let response = request
                .send()
                .await
                .map_err(|e| HttpError::from_reqwest(&url, &e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(HttpError::Status {
                    url,
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| HttpError::from_reqwest(&url, &e))?;

            let cached = CachedResponse {
                status: status.as_u16(),
                body: Arc::new(body.to_vec()),
                fetched_at: Instant::now(),
            };

            if !ttl.is_zero() {
                if entries.len() >= MAX_CACHE_ENTRIES {
                    evict_entries(&entries);
                }
                entries.insert(key, cached.clone());
            }

            Ok(cached)
        }
        .boxed()
        .shared()
    }

    /// Clears all cached entries.
    ///
    /// In-flight requests are unaffected.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of requests currently in flight.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Evicts approximately 10% of cache entries, oldest first.
fn evict_entries(entries: &DashMap<String, CachedResponse>) {
    let target_removals = MAX_CACHE_ENTRIES / 10;

    let mut by_age: Vec<(String, Instant)> = entries
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().fetched_at))
        .collect();

    by_age.sort_by_key(|(_, time)| *time);

    for (key, _) in by_age.iter().take(target_removals) {
        entries.remove(key);
    }

    tracing::debug!("evicted {} cache entries", target_removals.min(by_age.len()));
}
