// Tests for the aggregator, driven by an in-memory probe

use chrono::{DateTime, TimeZone, Utc};
use phishline_core::{Feature, FeatureExtractor, FeatureVector, Score};
use phishline_probe::{
    CachedProbe, DomainRecord, PageContent, Probe, ProbeError, RedirectTrace, Result,
};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const DOM_FEATURES: [Feature; 10] = [
    Feature::Favicon,
    Feature::RequestUrl,
    Feature::UrlOfAnchor,
    Feature::LinksInTags,
    Feature::Sfh,
    Feature::SubmittingToEmail,
    Feature::OnMouseover,
    Feature::RightClick,
    Feature::PopUpWidnow,
    Feature::Iframe,
];

const UNAVAILABLE_FEATURES: [Feature; 5] = [
    Feature::WebTraffic,
    Feature::PageRank,
    Feature::GoogleIndex,
    Feature::LinksPointingToPage,
    Feature::StatisticalReport,
];

const BENIGN_PAGE: &str = r#"<html><head>
<link rel="icon" href="/favicon.ico">
<title>Example</title>
</head><body><p>Welcome</p></body></html>"#;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

#[derive(Clone)]
struct MockProbe {
    record: Option<DomainRecord>,
    addresses: Option<Vec<IpAddr>>,
    html: Option<String>,
    hops: Option<usize>,
    stall_page: bool,
    /// When set, only this exact host resolves.
    resolvable_host: Option<&'static str>,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockProbe {
    fn benign() -> Self {
        Self {
            record: Some(DomainRecord {
                domain: "example.com".to_string(),
                server: "whois.test".to_string(),
                creation_date: Some(Utc.with_ymd_and_hms(2005, 3, 1, 0, 0, 0).unwrap()),
                expiration_date: Some(Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap()),
                raw_text: "Domain Name: EXAMPLE.COM".to_string(),
            }),
            addresses: Some(vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]),
            html: Some(BENIGN_PAGE.to_string()),
            hops: Some(0),
            stall_page: false,
            resolvable_host: None,
            calls: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self, lookup: &str, target: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .unwrap()
            .push(format!("{}:{}", lookup, target));
    }

    /// Every lookup target seen so far, sorted since the lookups run concurrently.
    fn received(&self) -> Vec<String> {
        let mut received = self.received.lock().unwrap().clone();
        received.sort();
        received
    }
}

impl Probe for MockProbe {
    async fn whois(&self, host: &str) -> Result<DomainRecord> {
        self.record_call("whois", host);
        self.record
            .clone()
            .ok_or_else(|| ProbeError::NotRegistered(host.to_string()))
    }

    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.record_call("dns", host);
        if self.resolvable_host.is_some_and(|name| name != host) {
            return Err(ProbeError::Unresolved(host.to_string()));
        }
        self.addresses
            .clone()
            .ok_or_else(|| ProbeError::Unresolved(host.to_string()))
    }

    async fn fetch_page(&self, url: &str) -> Result<PageContent> {
        self.record_call("page", url);
        if self.stall_page {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        match &self.html {
            Some(html) => Ok(PageContent {
                url: url.to_string(),
                final_url: url.to_string(),
                status_code: 200,
                html: html.clone(),
            }),
            None => Err(ProbeError::UnexpectedStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn trace_redirects(&self, url: &str) -> Result<RedirectTrace> {
        self.record_call("redirect", url);
        match self.hops {
            Some(hops) => Ok(RedirectTrace {
                hops: vec![url.to_string(); hops],
            }),
            None => Err(ProbeError::InvalidUrl(url.to_string())),
        }
    }
}

fn extractor(probe: MockProbe) -> FeatureExtractor<MockProbe> {
    FeatureExtractor::new(probe).with_clock(fixed_now)
}

fn assert_well_formed(vector: &FeatureVector) {
    assert_eq!(vector.len(), 30);
    assert!(vector.values().iter().all(|v| (-1..=1).contains(v)));
}

// ============================================================================
// Whole-call fallback
// ============================================================================

#[tokio::test]
async fn test_malformed_input_is_all_phishing_without_probing() {
    let probe = MockProbe::benign();
    let extractor = extractor(probe.clone());

    for input in ["", "   ", "://bad"] {
        let vector = extractor.extract(input).await;
        assert_eq!(vector, FeatureVector::phishing());
        assert_eq!(vector.values(), [-1; 30]);
    }
    assert_eq!(probe.calls(), 0);
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_benign_url_scores() {
    let vector = extractor(MockProbe::benign())
        .extract("https://www.example.com/login")
        .await;

    assert_well_formed(&vector);
    for (feature, score) in vector.iter() {
        if UNAVAILABLE_FEATURES.contains(&feature) {
            assert_eq!(score, Score::Phishing, "{}", feature);
        } else {
            assert_eq!(score, Score::Legitimate, "{}", feature);
        }
    }
}

#[tokio::test]
async fn test_extraction_is_deterministic() {
    let extractor = extractor(MockProbe::benign());
    let first = extractor.extract("http://login-example.com:8080/a@b").await;
    let second = extractor.extract("http://login-example.com:8080/a@b").await;

    assert_eq!(first, second);
    assert_eq!(first.get(Feature::PrefixSuffix), Score::Phishing);
    assert_eq!(first.get(Feature::Port), Score::Phishing);
    assert_eq!(first.get(Feature::HavingAtSymbol), Score::Phishing);
}

#[tokio::test]
async fn test_unavailable_signals_are_always_phishing() {
    let vector = extractor(MockProbe::benign())
        .extract("https://example.com")
        .await;

    for feature in UNAVAILABLE_FEATURES {
        assert_eq!(vector.get(feature), Score::Phishing);
    }
}

// ============================================================================
// Lookup targets
// ============================================================================

#[tokio::test]
async fn test_host_lookups_drop_www_prefix() {
    let probe = MockProbe {
        resolvable_host: Some("example.com"),
        ..MockProbe::benign()
    };
    let vector = extractor(probe.clone())
        .extract("http://www.example.com/")
        .await;

    assert_eq!(
        probe.received(),
        vec![
            "dns:example.com",
            "page:http://www.example.com/",
            "redirect:http://www.example.com/",
            "whois:example.com",
        ]
    );
    assert_eq!(vector.get(Feature::DnsRecord), Score::Legitimate);
    assert_eq!(vector.get(Feature::AbnormalUrl), Score::Legitimate);
}

#[tokio::test]
async fn test_schemeless_input_fetches_with_http() {
    let probe = MockProbe::benign();
    let vector = extractor(probe.clone()).extract("example.com/login").await;

    assert_eq!(
        probe.received(),
        vec![
            "dns:example.com",
            "page:http://example.com/login",
            "redirect:http://example.com/login",
            "whois:example.com",
        ]
    );
    assert_eq!(vector.get(Feature::SslFinalState), Score::Phishing);
}

// ============================================================================
// Partial failures
// ============================================================================

#[tokio::test]
async fn test_page_failure_only_affects_dom_features() {
    let healthy = extractor(MockProbe::benign())
        .extract("https://www.example.com/login")
        .await;

    let probe = MockProbe {
        html: None,
        ..MockProbe::benign()
    };
    let vector = extractor(probe)
        .extract("https://www.example.com/login")
        .await;

    assert_well_formed(&vector);
    for (feature, score) in vector.iter() {
        if DOM_FEATURES.contains(&feature) {
            assert_eq!(score, Score::Phishing, "{}", feature);
        } else {
            assert_eq!(score, healthy.get(feature), "{}", feature);
        }
    }
}

#[tokio::test]
async fn test_missing_whois_record() {
    let probe = MockProbe {
        record: None,
        ..MockProbe::benign()
    };
    let vector = extractor(probe).extract("https://example.com").await;

    assert_eq!(vector.get(Feature::DomainRegisterationLength), Score::Phishing);
    assert_eq!(vector.get(Feature::AbnormalUrl), Score::Phishing);
    assert_eq!(vector.get(Feature::AgeOfDomain), Score::Phishing);
    assert_eq!(vector.get(Feature::DnsRecord), Score::Legitimate);
}

#[tokio::test]
async fn test_dns_and_redirect_failures() {
    let probe = MockProbe {
        addresses: None,
        hops: None,
        ..MockProbe::benign()
    };
    let vector = extractor(probe).extract("https://example.com").await;

    assert_eq!(vector.get(Feature::DnsRecord), Score::Phishing);
    assert_eq!(vector.get(Feature::Redirect), Score::Phishing);
    assert_eq!(vector.get(Feature::Favicon), Score::Legitimate);
}

#[tokio::test]
async fn test_redirect_chain_length() {
    let probe = MockProbe {
        hops: Some(3),
        ..MockProbe::benign()
    };
    let vector = extractor(probe).extract("https://example.com").await;
    assert_eq!(vector.get(Feature::Redirect), Score::Suspicious);
}

#[tokio::test]
async fn test_young_domain_uses_injected_clock() {
    let mut probe = MockProbe::benign();
    if let Some(record) = probe.record.as_mut() {
        record.creation_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }
    let vector = extractor(probe).extract("https://example.com").await;
    assert_eq!(vector.get(Feature::AgeOfDomain), Score::Suspicious);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_page_fetch_is_bounded() {
    let probe = MockProbe {
        stall_page: true,
        ..MockProbe::benign()
    };
    let extractor = extractor(probe).with_budget(Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    let vector = extractor.extract("https://example.com").await;

    assert!(started.elapsed() < Duration::from_secs(3));
    for feature in DOM_FEATURES {
        assert_eq!(vector.get(feature), Score::Phishing);
    }
    assert_eq!(vector.get(Feature::DnsRecord), Score::Legitimate);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_cached_probe_reuses_lookups() {
    let probe = MockProbe::benign();
    let cached = CachedProbe::new(
        probe.clone(),
        Duration::from_secs(300),
        Duration::from_secs(10),
    );
    let extractor = FeatureExtractor::new(cached).with_clock(fixed_now);

    let first = extractor.extract("https://example.com").await;
    let second = extractor.extract("https://example.com").await;

    assert_eq!(first, second);
    assert_eq!(probe.calls(), 4);
}

// ============================================================================
// Network probe against a local server
// ============================================================================

#[tokio::test]
async fn test_network_extractor_against_local_server() {
    use phishline_core::ExtractorConfig;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    r#"<html><head></head><body>
                    <form action="mailto:drop@evil.net"></form>
                    <iframe src="/x" width="0" height="0"></iframe>
                    </body></html>"#,
                ),
        )
        .mount(&mock_server)
        .await;

    let mut config = ExtractorConfig::default();
    config.budget_secs = 5;
    config.probe.timeout_secs = 5;
    let extractor = FeatureExtractor::network(&config)
        .unwrap()
        .with_clock(fixed_now);

    let url = format!("{}/login", mock_server.uri());
    let vector = extractor.extract(&url).await;

    assert_well_formed(&vector);
    // 127.0.0.1 with an explicit port
    assert_eq!(vector.get(Feature::HavingIpAddress), Score::Phishing);
    assert_eq!(vector.get(Feature::Port), Score::Phishing);
    // no WHOIS for IP literals
    assert_eq!(vector.get(Feature::AgeOfDomain), Score::Phishing);
    assert_eq!(vector.get(Feature::DnsRecord), Score::Legitimate);
    assert_eq!(vector.get(Feature::Redirect), Score::Legitimate);
    // page was fetched and parsed
    assert_eq!(vector.get(Feature::Favicon), Score::Phishing);
    assert_eq!(vector.get(Feature::Sfh), Score::Phishing);
    assert_eq!(vector.get(Feature::SubmittingToEmail), Score::Phishing);
    assert_eq!(vector.get(Feature::Iframe), Score::Phishing);
    assert_eq!(vector.get(Feature::RequestUrl), Score::Legitimate);
}
