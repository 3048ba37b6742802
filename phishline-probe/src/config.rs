use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Settings shared by every network probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Accept invalid TLS certificates on the page fetch. Phishing pages are
    /// often served with broken certificates and still need to be read.
    pub accept_invalid_certs: bool,
    /// Query this WHOIS server (`host` or `host:port`) directly instead of
    /// following the IANA referral.
    pub whois_server: Option<String>,
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
            whois_server: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_whois_server(mut self, server: impl Into<String>) -> Self {
        self.whois_server = Some(server.into());
        self
    }
}
