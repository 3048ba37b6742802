use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use std::net::IpAddr;
use std::time::Duration;
use tokio::net::lookup_host;
use tracing::debug;

/// Forward resolution through the system resolver.
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            timeout: config.timeout(),
        }
    }

    pub async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        debug!("Resolving {}", bare);

        let addrs = tokio::time::timeout(self.timeout, lookup_host((bare, 80)))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|_| ProbeError::Unresolved(host.to_string()))?;

        let mut ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
        ips.sort();
        ips.dedup();

        if ips.is_empty() {
            return Err(ProbeError::Unresolved(host.to_string()));
        }
        Ok(ips)
    }
}
