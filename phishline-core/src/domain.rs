// Scorers fed by WHOIS, DNS and the redirect probe

use crate::error::{Analysis, AnalysisError};
use crate::feature::Score;
use chrono::{DateTime, Utc};
use phishline_probe::{DomainRecord, RedirectTrace};
use std::net::IpAddr;

const MIN_REGISTRATION_DAYS: i64 = 365;
const ESTABLISHED_AGE_DAYS: i64 = 180;
const YOUNG_AGE_DAYS: i64 = 30;

pub fn domain_registeration_length(record: &DomainRecord) -> Analysis {
    let created = record
        .creation_date
        .ok_or(AnalysisError::MissingDate("creation"))?;
    let expires = record
        .expiration_date
        .ok_or(AnalysisError::MissingDate("expiration"))?;

    let registered_days = (expires - created).num_days();
    Ok(Score::from_indicator(registered_days < MIN_REGISTRATION_DAYS))
}

pub fn age_of_domain(record: &DomainRecord, now: DateTime<Utc>) -> Analysis {
    let created = record
        .creation_date
        .ok_or(AnalysisError::MissingDate("creation"))?;

    let age_days = (now - created).num_days();
    Ok(if age_days >= ESTABLISHED_AGE_DAYS {
        Score::Legitimate
    } else if age_days >= YOUNG_AGE_DAYS {
        Score::Suspicious
    } else {
        Score::Phishing
    })
}

/// The host should appear somewhere in its own WHOIS answer.
pub fn abnormal_url(record: &DomainRecord, host: &str) -> Analysis {
    let listed = record
        .raw_text
        .to_lowercase()
        .contains(&host.to_lowercase());
    Ok(Score::from_indicator(!listed))
}

pub fn dns_record(addresses: &[IpAddr]) -> Analysis {
    if addresses.is_empty() {
        return Err(AnalysisError::Unresolved);
    }
    Ok(Score::Legitimate)
}

pub fn redirect(trace: &RedirectTrace) -> Analysis {
    Ok(match trace.hop_count() {
        0 | 1 => Score::Legitimate,
        2..=4 => Score::Suspicious,
        _ => Score::Phishing,
    })
}
