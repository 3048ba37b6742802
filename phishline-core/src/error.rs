use crate::feature::{Feature, Score};
use thiserror::Error;

/// Input that cannot be turned into a URL with a host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed URL {input:?}: {reason}")]
pub struct MalformedUrl {
    pub input: String,
    pub reason: String,
}

/// Why an analyzer could not produce a score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("page content unavailable")]
    MissingPage,

    #[error("WHOIS record unavailable")]
    MissingDomainRecord,

    #[error("WHOIS record has no {0} date")]
    MissingDate(&'static str),

    #[error("host did not resolve")]
    Unresolved,

    #[error("redirect probe failed")]
    RedirectProbeFailed,

    #[error("HTML parse error: {0}")]
    Parse(String),

    #[error("cannot decompose host {0}")]
    Decomposition(String),

    #[error("no data source for {0}")]
    Unavailable(Feature),
}

pub type Analysis = Result<Score, AnalysisError>;
