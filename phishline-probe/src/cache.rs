// Host-keyed result cache with a TTL and single-flight lookups

use crate::error::{ProbeError, Result};
use crate::probe::Probe;
use crate::result::{DomainRecord, PageContent, RedirectTrace};
use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    created: Instant,
    cell: Arc<OnceCell<V>>,
}

/// Successful values live for `ttl`. Concurrent callers for one key share a
/// single in-flight lookup, and no caller waits longer than `wait`.
/// Failures are never stored.
pub struct TtlCache<V> {
    ttl: Duration,
    wait: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new(ttl: Duration, wait: Duration) -> Self {
        Self {
            ttl,
            wait,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.created.elapsed() < ttl);
            entries
                .entry(key.to_string())
                .or_insert_with(|| Entry {
                    created: Instant::now(),
                    cell: Arc::new(OnceCell::new()),
                })
                .cell
                .clone()
        };

        if let Some(value) = cell.get() {
            debug!("cache hit for {}", key);
            return Ok(value.clone());
        }

        match tokio::time::timeout(self.wait, cell.get_or_try_init(fetch)).await {
            Ok(Ok(value)) => Ok(value.clone()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProbeError::Timeout(self.wait)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Wraps another probe with one cache per lookup kind.
pub struct CachedProbe<P> {
    inner: P,
    whois: TtlCache<DomainRecord>,
    dns: TtlCache<Vec<IpAddr>>,
    pages: TtlCache<PageContent>,
    redirects: TtlCache<RedirectTrace>,
}

impl<P: Probe> CachedProbe<P> {
    pub fn new(inner: P, ttl: Duration, wait: Duration) -> Self {
        Self {
            inner,
            whois: TtlCache::new(ttl, wait),
            dns: TtlCache::new(ttl, wait),
            pages: TtlCache::new(ttl, wait),
            redirects: TtlCache::new(ttl, wait),
        }
    }
}

impl<P: Probe> Probe for CachedProbe<P> {
    async fn whois(&self, host: &str) -> Result<DomainRecord> {
        self.whois
            .get_or_fetch(host, || self.inner.whois(host))
            .await
    }

    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.dns
            .get_or_fetch(host, || self.inner.resolve(host))
            .await
    }

    async fn fetch_page(&self, url: &str) -> Result<PageContent> {
        self.pages
            .get_or_fetch(url, || self.inner.fetch_page(url))
            .await
    }

    async fn trace_redirects(&self, url: &str) -> Result<RedirectTrace> {
        self.redirects
            .get_or_fetch(url, || self.inner.trace_redirects(url))
            .await
    }
}
