use crate::dom::{self, ParsedPage};
use crate::domain;
use crate::error::{Analysis, AnalysisError};
use crate::feature::{Feature, FeatureVector, Score};
use crate::lexical;
use crate::unavailable;
use crate::url_context::UrlContext;
use chrono::{DateTime, Utc};
use phishline_probe::{
    CachedProbe, DomainRecord, NetworkProbe, Probe, ProbeConfig, RedirectTrace,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const DEFAULT_BUDGET_SECS: u64 = 10;

/// Everything needed to build an extractor backed by the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub probe: ProbeConfig,
    /// Upper bound on each external lookup
    pub budget_secs: u64,
    /// Cache lookups per host for this long; `None` disables the cache
    pub cache_ttl_secs: Option<u64>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            budget_secs: DEFAULT_BUDGET_SECS,
            cache_ttl_secs: None,
        }
    }
}

impl ExtractorConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs)
    }
}

/// Turns a URL into its 30-score vector.
///
/// The four external lookups run concurrently, each bounded by the budget.
/// A lookup that fails or runs out of time is simply absent, and only the
/// features that read it fall back to -1. `extract` never fails.
pub struct FeatureExtractor<P> {
    probe: P,
    budget: Duration,
    clock: fn() -> DateTime<Utc>,
}

impl<P: Probe> FeatureExtractor<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            budget: Duration::from_secs(DEFAULT_BUDGET_SECS),
            clock: Utc::now,
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Replace the clock used for domain age.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn extract(&self, raw: &str) -> FeatureVector {
        let ctx = match UrlContext::parse(raw) {
            Ok(ctx) => ctx,
            Err(e) => {
                debug!("{}", e);
                return FeatureVector::phishing();
            }
        };

        let evidence = self.gather(&ctx).await;
        let now = (self.clock)();

        FeatureVector::from_scores(
            Feature::ALL
                .iter()
                .map(|&feature| score(feature, evidence.analyze(feature, &ctx, now))),
        )
    }

    async fn gather(&self, ctx: &UrlContext) -> Evidence {
        let (record, addresses, page, trace) = tokio::join!(
            self.bounded("whois", &ctx.clean_host, self.probe.whois(&ctx.clean_host)),
            self.bounded("dns", &ctx.clean_host, self.probe.resolve(&ctx.clean_host)),
            self.bounded("page", &ctx.url, self.probe.fetch_page(&ctx.url)),
            self.bounded("redirect", &ctx.url, self.probe.trace_redirects(&ctx.url)),
        );

        let page = match page {
            Some(content) => ParsedPage::parse(&content.html),
            None => Err(AnalysisError::MissingPage),
        };

        Evidence {
            record,
            addresses,
            page,
            trace,
        }
    }

    async fn bounded<T>(
        &self,
        lookup: &'static str,
        target: &str,
        probe: impl Future<Output = phishline_probe::Result<T>>,
    ) -> Option<T> {
        match timeout(self.budget, probe).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!("{} lookup for {} failed: {}", lookup, target, e);
                None
            }
            Err(_) => {
                debug!(
                    "{} lookup for {} exceeded {:?}",
                    lookup, target, self.budget
                );
                None
            }
        }
    }
}

impl FeatureExtractor<NetworkProbe> {
    pub fn network(config: &ExtractorConfig) -> phishline_probe::Result<Self> {
        Ok(FeatureExtractor::new(NetworkProbe::new(&config.probe)?).with_budget(config.budget()))
    }
}

impl FeatureExtractor<CachedProbe<NetworkProbe>> {
    /// Network extractor that reuses lookups for `ttl`. Waiting on another
    /// caller's lookup is bounded by the same budget.
    pub fn cached(config: &ExtractorConfig, ttl: Duration) -> phishline_probe::Result<Self> {
        let probe = CachedProbe::new(NetworkProbe::new(&config.probe)?, ttl, config.budget());
        Ok(FeatureExtractor::new(probe).with_budget(config.budget()))
    }
}

/// The single place an analyzer error becomes -1.
fn score(feature: Feature, analysis: Analysis) -> Score {
    analysis.unwrap_or_else(|reason| {
        debug!("{} scored -1: {}", feature, reason);
        Score::Phishing
    })
}

/// What the lookups produced for one URL.
struct Evidence {
    record: Option<DomainRecord>,
    addresses: Option<Vec<IpAddr>>,
    page: Result<ParsedPage, AnalysisError>,
    trace: Option<RedirectTrace>,
}

impl Evidence {
    fn with_page(&self, analyzer: impl FnOnce(&ParsedPage) -> Analysis) -> Analysis {
        self.page.as_ref().map_err(Clone::clone).and_then(analyzer)
    }

    fn with_record(&self, analyzer: impl FnOnce(&DomainRecord) -> Analysis) -> Analysis {
        self.record
            .as_ref()
            .ok_or(AnalysisError::MissingDomainRecord)
            .and_then(analyzer)
    }

    fn analyze(&self, feature: Feature, ctx: &UrlContext, now: DateTime<Utc>) -> Analysis {
        let host = ctx.clean_host.as_str();

        match feature {
            Feature::HavingIpAddress => lexical::having_ip_address(ctx),
            Feature::UrlLength => lexical::url_length(ctx),
            Feature::ShortiningService => lexical::shortining_service(ctx),
            Feature::HavingAtSymbol => lexical::having_at_symbol(ctx),
            Feature::DoubleSlashRedirecting => lexical::double_slash_redirecting(ctx),
            Feature::PrefixSuffix => lexical::prefix_suffix(ctx),
            Feature::HavingSubDomain => lexical::having_sub_domain(ctx),
            Feature::SslFinalState => lexical::ssl_final_state(ctx),
            Feature::DomainRegisterationLength => {
                self.with_record(domain::domain_registeration_length)
            }
            Feature::Favicon => self.with_page(|page| dom::favicon(page, host)),
            Feature::Port => lexical::port(ctx),
            Feature::HttpsToken => lexical::https_token(ctx),
            Feature::RequestUrl => self.with_page(|page| dom::request_url(page, host)),
            Feature::UrlOfAnchor => self.with_page(|page| dom::url_of_anchor(page, host)),
            Feature::LinksInTags => self.with_page(|page| dom::links_in_tags(page, host)),
            Feature::Sfh => self.with_page(|page| dom::sfh(page, host)),
            Feature::SubmittingToEmail => self.with_page(dom::submitting_to_email),
            Feature::AbnormalUrl => self.with_record(|record| domain::abnormal_url(record, host)),
            Feature::Redirect => self
                .trace
                .as_ref()
                .ok_or(AnalysisError::RedirectProbeFailed)
                .and_then(domain::redirect),
            Feature::OnMouseover => self.with_page(dom::on_mouseover),
            Feature::RightClick => self.with_page(dom::right_click),
            Feature::PopUpWidnow => self.with_page(dom::pop_up_window),
            Feature::Iframe => self.with_page(dom::iframe),
            Feature::AgeOfDomain => self.with_record(|record| domain::age_of_domain(record, now)),
            Feature::DnsRecord => self
                .addresses
                .as_deref()
                .ok_or(AnalysisError::Unresolved)
                .and_then(domain::dns_record),
            Feature::WebTraffic => unavailable::web_traffic(ctx),
            Feature::PageRank => unavailable::page_rank(ctx),
            Feature::GoogleIndex => unavailable::google_index(ctx),
            Feature::LinksPointingToPage => unavailable::links_pointing_to_page(ctx),
            Feature::StatisticalReport => unavailable::statistical_report(ctx),
        }
    }
}

/// Extract with a default network extractor.
pub async fn extract_features(url: &str) -> FeatureVector {
    match FeatureExtractor::network(&ExtractorConfig::default()) {
        Ok(extractor) => extractor.extract(url).await,
        Err(e) => {
            warn!("Could not build network probe: {}", e);
            FeatureVector::phishing()
        }
    }
}
