// Scorers that only look at the URL string and its host

use crate::error::{Analysis, AnalysisError};
use crate::feature::Score;
use crate::url_context::UrlContext;
use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)",
    )
    .expect("IPv4 pattern is valid")
});

pub const SHORTENING_SERVICES: &[&str] = &[
    "bit.ly",
    "goo.gl",
    "shorte.st",
    "x.co",
    "ow.ly",
    "tinyurl.com",
    "t.co",
    "bit.do",
    "adf.ly",
    "bitly.com",
    "short.to",
    "rb.gy",
    "cutt.ly",
    "is.gd",
    "buff.ly",
    "tiny.cc",
    "lnkd.in",
];

const SHORT_URL_MAX: usize = 54;
const LONG_URL_MIN: usize = 75;

/// A dotted quad anywhere in the URL.
pub fn having_ip_address(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(IPV4_PATTERN.is_match(&ctx.url)))
}

pub fn url_length(ctx: &UrlContext) -> Analysis {
    let length = ctx.url.chars().count();
    Ok(if length < SHORT_URL_MAX {
        Score::Legitimate
    } else if length < LONG_URL_MIN {
        Score::Suspicious
    } else {
        Score::Phishing
    })
}

pub fn shortining_service(ctx: &UrlContext) -> Analysis {
    let shortened = SHORTENING_SERVICES.iter().any(|service| {
        ctx.host == *service
            || ctx
                .host
                .strip_suffix(service)
                .is_some_and(|rest| rest.ends_with('.'))
    });
    Ok(Score::from_indicator(shortened))
}

pub fn having_at_symbol(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(ctx.url.contains('@')))
}

/// `//` anywhere after the first `/` that follows the host.
pub fn double_slash_redirecting(ctx: &UrlContext) -> Analysis {
    let remaining = ctx
        .url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(&ctx.url);

    let redirected = remaining
        .find('/')
        .is_some_and(|first_slash| remaining[first_slash..].contains("//"));
    Ok(Score::from_indicator(redirected))
}

/// Dash anywhere in the host, subdomains included.
pub fn prefix_suffix(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(ctx.host.contains('-')))
}

/// Count the labels left of the registrable domain.
pub fn having_sub_domain(ctx: &UrlContext) -> Analysis {
    let host = ctx.host.as_str();
    if is_ip_host(host) || !host.contains('.') {
        return Ok(Score::Legitimate);
    }

    let domain =
        psl::domain_str(host).ok_or_else(|| AnalysisError::Decomposition(host.to_string()))?;
    let subdomain = host
        .strip_suffix(domain)
        .unwrap_or_default()
        .trim_end_matches('.');

    let labels = if subdomain.is_empty() {
        0
    } else {
        subdomain.split('.').count()
    };

    Ok(match labels {
        0 | 1 => Score::Legitimate,
        2 => Score::Suspicious,
        _ => Score::Phishing,
    })
}

pub fn ssl_final_state(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(!ctx.is_https()))
}

pub fn port(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(
        ctx.port.is_some_and(|port| port != 80 && port != 443),
    ))
}

/// `https` spelled into the host of a URL that is not served over https.
pub fn https_token(ctx: &UrlContext) -> Analysis {
    Ok(Score::from_indicator(
        ctx.host.contains("https") && !ctx.is_https(),
    ))
}

pub(crate) fn is_ip_host(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(url: &str) -> UrlContext {
        UrlContext::parse(url).unwrap()
    }

    #[test]
    fn test_is_ip_host() {
        assert!(is_ip_host("10.0.0.1"));
        assert!(is_ip_host("[::1]"));
        assert!(!is_ip_host("example.com"));
    }

    #[test]
    fn test_double_slash_in_scheme_is_ignored() {
        assert_eq!(
            double_slash_redirecting(&ctx("https://example.com/path")),
            Ok(Score::Legitimate)
        );
        assert_eq!(
            double_slash_redirecting(&ctx("http://example.com")),
            Ok(Score::Legitimate)
        );
    }

    #[test]
    fn test_shortener_requires_label_boundary() {
        // "t.co" must not match "microsoft.com"
        assert_eq!(
            shortining_service(&ctx("http://microsoft.com/")),
            Ok(Score::Legitimate)
        );
        assert_eq!(
            shortining_service(&ctx("http://www.bit.ly/abc")),
            Ok(Score::Phishing)
        );
    }
}
