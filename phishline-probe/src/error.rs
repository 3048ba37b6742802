use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("WHOIS lookup failed: {0}")]
    WhoisError(String),

    #[error("WHOIS client error: {0}")]
    WhoisClientError(#[from] whois_rust::WhoIsError),

    #[error("No WHOIS record for {0}")]
    NotRegistered(String),

    #[error("No DNS record for {0}")]
    Unresolved(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
