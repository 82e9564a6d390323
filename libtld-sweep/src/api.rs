use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const RAPIDAPI_HOST: &str = "domainr.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
}

/// Query the status API for one candidate.
///
/// Returns the provider status string, `"N/A"` when the body carries no
/// status field, or `None` when the request fails in any way. A failed
/// candidate is simply dropped from the sweep; nothing is retried.
pub async fn check_status(
    client: &Client,
    api_base: &str,
    api_key: &str,
    domain: &str,
    timeout: Duration,
) -> Option<String> {
    let url = format!("{}/v2/status", api_base.trim_end_matches('/'));

    let request = client
        .get(&url)
        .query(&[("mashape-key", api_key), ("domain", domain)])
        .header("X-RapidAPI-Host", RAPIDAPI_HOST)
        .header("X-RapidAPI-Key", api_key)
        .send();

    let response = match tokio::time::timeout(timeout, request).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::debug!(domain, error = %e, "status request failed, skipping");
            return None;
        }
        Err(_) => {
            tracing::debug!(domain, "status request timed out, skipping");
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(domain, http = response.status().as_u16(), "non-success status, skipping");
        return None;
    }

    match response.json::<StatusResponse>().await {
        Ok(body) => Some(body.status.unwrap_or_else(|| "N/A".to_string())),
        Err(e) => {
            tracing::debug!(domain, error = %e, "unparseable status body, skipping");
            None
        }
    }
}
