// WHOIS lookups mapped to a typed DomainRecord

use crate::config::{IANA_WHOIS_SERVER, ProbeConfig};
use crate::error::{ProbeError, Result};
use crate::result::DomainRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;
use whois_rust::{WhoIs, WhoIsLookupOptions};

/// IANA, then the registry, then the registrar.
const REFERRAL_DEPTH: u16 = 2;

const CREATION_KEYS: &[&str] = &[
    "creation date",
    "created",
    "created on",
    "registered on",
    "registration time",
    "domain registration date",
];

const EXPIRATION_KEYS: &[&str] = &[
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expires on",
    "paid-till",
    "expiration time",
];

const NOT_FOUND_MARKERS: &[&str] = &[
    "no match for",
    "no data found",
    "no entries found",
    "no object found",
    "domain not found",
    "status: free",
    "status: available",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%d.%m.%Y", "%Y/%m/%d"];

pub struct WhoisClient {
    client: WhoIs,
    server: String,
    follow: u16,
    timeout: Duration,
}

impl WhoisClient {
    /// A configured server is queried directly. Otherwise lookups start at
    /// IANA and follow the referral chain.
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let (server, follow) = match &config.whois_server {
            Some(server) => (server.clone(), 0),
            None => (IANA_WHOIS_SERVER.to_string(), REFERRAL_DEPTH),
        };

        Ok(Self {
            client: WhoIs::from_host(&server)?,
            server,
            follow,
            timeout: config.timeout(),
        })
    }

    /// Look up the registrable domain of `host`.
    pub async fn lookup(&self, host: &str) -> Result<DomainRecord> {
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.parse::<IpAddr>().is_ok() {
            return Err(ProbeError::WhoisError(format!(
                "{} is an IP literal",
                host
            )));
        }

        let domain = psl::domain_str(host).unwrap_or(host).to_string();

        let mut options = WhoIsLookupOptions::from_string(&domain)?;
        options.follow = self.follow;
        options.timeout = Some(self.timeout);

        debug!("WHOIS {} via {}", domain, self.server);
        let raw_text = tokio::time::timeout(self.timeout, self.client.lookup_async(options))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        if raw_text.trim().is_empty() || is_not_found(&raw_text) {
            return Err(ProbeError::NotRegistered(domain));
        }

        Ok(parse_record(&domain, &self.server, &raw_text))
    }
}

fn is_not_found(raw_text: &str) -> bool {
    let lowered = raw_text.to_lowercase();
    NOT_FOUND_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Map a WHOIS answer to a record. The first parseable date for each key wins.
pub fn parse_record(domain: &str, server: &str, raw_text: &str) -> DomainRecord {
    let mut creation_date = None;
    let mut expiration_date = None;

    for line in raw_text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();

        if creation_date.is_none() && CREATION_KEYS.contains(&key.as_str()) {
            creation_date = parse_whois_date(value);
        } else if expiration_date.is_none() && EXPIRATION_KEYS.contains(&key.as_str()) {
            expiration_date = parse_whois_date(value);
        }
    }

    DomainRecord {
        domain: domain.to_string(),
        server: server.to_string(),
        creation_date,
        expiration_date,
        raw_text: raw_text.to_string(),
    }
}

pub fn parse_whois_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim().trim_end_matches(" UTC").trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    // Some registries append a note after the date: "2001-02-03 (YYYY-MM-DD)"
    let first_token = value.split_whitespace().next().unwrap_or(value);
    for candidate in [value, first_token] {
        for format in DATE_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(candidate, format) {
                return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            }
        }
    }

    None
}
