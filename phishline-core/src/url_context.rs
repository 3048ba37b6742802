use crate::error::MalformedUrl;
use url::Url;

/// Parsed view of the URL under analysis. Built once per extraction and
/// shared by every analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContext {
    /// The input exactly as given
    pub original: String,
    /// The input with `http://` prepended when it had no scheme
    pub url: String,
    pub scheme: String,
    /// Lowercased host, port excluded
    pub host: String,
    /// Host without a leading `www.`
    pub clean_host: String,
    /// Explicit port, when it is not the scheme default
    pub port: Option<u16>,
    pub path: String,
}

impl UrlContext {
    pub fn parse(raw: &str) -> Result<Self, MalformedUrl> {
        let trimmed = raw.trim();
        let malformed = |reason: String| MalformedUrl {
            input: raw.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(malformed("empty input".to_string()));
        }

        let url = if has_http_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let parsed = Url::parse(&url).map_err(|e| malformed(e.to_string()))?;
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| malformed("no host".to_string()))?
            .to_lowercase();

        let clean_host = host.strip_prefix("www.").unwrap_or(&host).to_string();

        Ok(Self {
            original: raw.to_string(),
            url,
            scheme: parsed.scheme().to_string(),
            host,
            clean_host,
            port: parsed.port(),
            path: parsed.path().to_string(),
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lowered = input.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
