pub mod cache;
pub mod config;
pub mod dns;
pub mod error;
pub mod fetcher;
pub mod probe;
pub mod result;
pub mod whois;

pub use cache::CachedProbe;
pub use config::ProbeConfig;
pub use error::{ProbeError, Result};
pub use probe::{NetworkProbe, Probe};
pub use result::{DomainRecord, PageContent, RedirectTrace};
