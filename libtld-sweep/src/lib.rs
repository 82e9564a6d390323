mod api;
mod http;
mod prober;
pub mod report;
pub mod tlds;
mod types;
mod whois;

pub use prober::Prober;
pub use report::ReportError;
pub use tlds::{expand_tlds, fetch_tlds, load_tld_file, TldError, IANA_TLD_LIST_URL};
pub use types::{DomainStatus, ProbeConfig, ProbeResult};

use futures::StreamExt;

/// Probe a single domain over WHOIS with the default configuration.
pub async fn probe(domain: &str) -> ProbeResult {
    Prober::new().probe_whois_one(domain).await
}

/// Probe many domains over WHOIS with the default configuration,
/// collecting results as they complete.
pub async fn probe_many<I>(domains: I) -> Vec<ProbeResult>
where
    I: IntoIterator<Item = String> + 'static,
{
    Prober::new().probe_whois_stream(domains).collect().await
}
