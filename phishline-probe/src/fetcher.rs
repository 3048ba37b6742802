use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::result::{PageContent, RedirectTrace};
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

/// Fetches page bodies and traces redirect chains.
pub struct PageFetcher {
    client: Client,
    probe_client: Client,
    max_redirects: usize,
}

impl PageFetcher {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.timeout() / 2)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        // Redirects are followed by hand so every hop can be counted.
        let probe_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.timeout() / 2)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            probe_client,
            max_redirects: config.max_redirects,
        })
    }

    /// GET the page; only a 200 answer counts as content.
    pub async fn fetch_page(&self, url: &str) -> Result<PageContent> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        if response.status() != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus {
                url: url.to_string(),
                status: status_code,
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;

        Ok(PageContent {
            url: url.to_string(),
            final_url,
            status_code,
            html,
        })
    }

    /// HEAD the URL without following redirects. When it answers with a
    /// redirect, walk the chain with GETs and record every hop.
    pub async fn trace_redirects(&self, url: &str) -> Result<RedirectTrace> {
        debug!("Tracing redirects for {}", url);

        let head = self.probe_client.head(url).send().await?;
        if !is_redirect(head.status()) {
            return Ok(RedirectTrace::default());
        }

        let mut current =
            Url::parse(url).map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", url, e)))?;
        let mut hops = Vec::new();

        while hops.len() < self.max_redirects {
            let response = self.probe_client.get(current.clone()).send().await?;
            if !is_redirect(response.status()) {
                break;
            }

            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                break;
            };

            let next = current
                .join(location)
                .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", location, e)))?;
            debug!("  -> hop {} to {}", hops.len() + 1, next);
            hops.push(next.to_string());
            current = next;
        }

        Ok(RedirectTrace { hops })
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}
