use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry metadata for a domain, mapped from the raw WHOIS answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// The name that was queried (registrable domain of the host)
    pub domain: String,
    /// WHOIS server that produced the answer
    pub server: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    /// Full text of the answer, kept for containment checks
    pub raw_text: String,
}

/// A page that answered 200 to a GET.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub html: String,
}

/// Redirect hops observed when following a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTrace {
    /// Each `Location` target, in the order it was followed
    pub hops: Vec<String>,
}

impl RedirectTrace {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}
