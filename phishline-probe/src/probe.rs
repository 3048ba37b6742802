use crate::config::ProbeConfig;
use crate::dns::DnsResolver;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::result::{DomainRecord, PageContent, RedirectTrace};
use crate::whois::WhoisClient;
use std::future::Future;
use std::net::IpAddr;

/// The external lookups feature extraction depends on. Each call is a
/// single attempt; callers decide what an error means.
pub trait Probe: Send + Sync {
    fn whois(&self, host: &str) -> impl Future<Output = Result<DomainRecord>> + Send;

    fn resolve(&self, host: &str) -> impl Future<Output = Result<Vec<IpAddr>>> + Send;

    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<PageContent>> + Send;

    fn trace_redirects(&self, url: &str) -> impl Future<Output = Result<RedirectTrace>> + Send;
}

/// Probe backed by real WHOIS, DNS and HTTP traffic.
pub struct NetworkProbe {
    whois: WhoisClient,
    dns: DnsResolver,
    fetcher: PageFetcher,
}

impl NetworkProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        Ok(Self {
            whois: WhoisClient::new(config)?,
            dns: DnsResolver::new(config),
            fetcher: PageFetcher::new(config)?,
        })
    }
}

impl Probe for NetworkProbe {
    async fn whois(&self, host: &str) -> Result<DomainRecord> {
        self.whois.lookup(host).await
    }

    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.dns.resolve(host).await
    }

    async fn fetch_page(&self, url: &str) -> Result<PageContent> {
        self.fetcher.fetch_page(url).await
    }

    async fn trace_redirects(&self, url: &str) -> Result<RedirectTrace> {
        self.fetcher.trace_redirects(url).await
    }
}
