use crate::{
    api::check_status,
    http::create_http_pool,
    types::{DomainStatus, ProbeConfig, ProbeResult},
    whois::check_whois,
};
use futures::stream::{self, Stream, StreamExt};
use futures::Future;
use reqwest::Client;
use std::time::Instant;

/// Bounded concurrent fan-out: at most `width` lookups in flight, results
/// yielded as they complete. Every item is processed exactly once.
fn fan_out<T, F, Fut>(items: Vec<T>, width: usize, f: F) -> impl Stream<Item = Fut::Output>
where
    F: FnMut(T) -> Fut,
    Fut: Future,
{
    stream::iter(items).map(f).buffer_unordered(width.max(1))
}

#[derive(Clone)]
pub struct Prober {
    client: Client,
    config: ProbeConfig,
}

impl Prober {
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    pub fn with_config(config: ProbeConfig) -> Self {
        let client = create_http_pool(config.timeout);
        Self { client, config }
    }

    /// Probe one candidate against the status API. `None` means the lookup
    /// failed and the candidate is dropped from the sweep.
    pub async fn probe_api(&self, api_key: &str, domain: &str) -> Option<ProbeResult> {
        let start = Instant::now();
        let status = check_status(
            &self.client,
            &self.config.api_base,
            api_key,
            domain,
            self.config.timeout,
        )
        .await?;

        Some(ProbeResult {
            domain: domain.to_string(),
            status: DomainStatus::Provider(status),
            duration: start.elapsed(),
        })
    }

    /// Probe candidates sequentially against the status API, preserving
    /// input order. Failed lookups are omitted from the result list.
    pub async fn probe_api_all<I>(&self, api_key: &str, domains: I) -> Vec<ProbeResult>
    where
        I: IntoIterator<Item = String>,
    {
        let mut results = Vec::new();
        for domain in domains {
            if let Some(result) = self.probe_api(api_key, &domain).await {
                tracing::debug!(domain = %result.domain, status = %result.status, "probed");
                results.push(result);
            }
        }
        results
    }

    pub async fn probe_whois_one(&self, domain: &str) -> ProbeResult {
        let start = Instant::now();
        let status = check_whois(domain, self.config.timeout).await;
        ProbeResult {
            domain: domain.to_string(),
            status,
            duration: start.elapsed(),
        }
    }

    /// Probe candidates over WHOIS through a fixed-width worker fan-out.
    /// Results arrive as completed; no ordering guarantee.
    pub fn probe_whois_stream<I>(&self, domains: I) -> impl Stream<Item = ProbeResult> + '_
    where
        I: IntoIterator<Item = String> + 'static,
    {
        let domains: Vec<String> = domains.into_iter().collect();

        fan_out(domains, self.config.workers, move |domain| async move {
            let result = self.probe_whois_one(&domain).await;
            tracing::debug!(domain = %result.domain, status = %result.status, "probed");
            result
        })
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn fan_out_completes_every_item_exactly_once() {
        let items: Vec<u32> = (0..57).collect();
        let calls = Arc::new(AtomicUsize::new(0));

        let outputs: Vec<u32> = fan_out(items.clone(), 10, |n| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                // Stagger completion so results interleave.
                tokio::time::sleep(Duration::from_millis((n % 7) as u64)).await;
                n
            }
        })
        .collect()
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), items.len());
        assert_eq!(outputs.len(), items.len());
        let unique: HashSet<u32> = outputs.iter().copied().collect();
        assert_eq!(unique, items.into_iter().collect::<HashSet<u32>>());
    }

    #[tokio::test]
    async fn fan_out_width_bounds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let _: Vec<()> = fan_out((0..40).collect(), 10, |_| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .collect()
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 10);
    }
}
