use crate::types::DomainStatus;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const WHOIS_PORT: u16 = 43;

fn whois_server(tld: &str) -> String {
    match tld {
        "com" | "net" => "whois.verisign-grs.com".to_string(),
        "org" => "whois.pir.org".to_string(),
        "io" => "whois.nic.io".to_string(),
        "dev" | "app" => "whois.nic.google".to_string(),
        "ai" => "whois.nic.ai".to_string(),
        "co" => "whois.nic.co".to_string(),
        "me" => "whois.nic.me".to_string(),
        // Most registries follow the whois.nic.<tld> convention.
        _ => format!("whois.nic.{}", tld),
    }
}

/// Value of the `Domain Name:` field, if the record carries one.
pub(crate) fn parse_domain_name_field(response: &str) -> Option<String> {
    response
        .lines()
        .map(|line| line.trim())
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("domain name") {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty())
}

/// Probe one candidate over WHOIS.
///
/// A candidate counts as registered only when the record carries a non-empty
/// domain-name field. Parse and transport failures are reported as
/// unregistered, never as errors.
pub async fn check_whois(domain: &str, timeout: Duration) -> DomainStatus {
    let tld = match domain.rsplit('.').next() {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => {
            tracing::debug!(domain, "malformed candidate, treating as unregistered");
            return DomainStatus::Unregistered;
        }
    };

    let server = whois_server(&tld);

    let result = tokio::time::timeout(timeout, async {
        let mut stream = TcpStream::connect((server.as_str(), WHOIS_PORT)).await?;
        stream.write_all(format!("{}\r\n", domain).as_bytes()).await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;

        Ok::<_, std::io::Error>(response)
    })
    .await;

    match result {
        Ok(Ok(response)) => match parse_domain_name_field(&response) {
            Some(_) => DomainStatus::Registered,
            None => DomainStatus::Unregistered,
        },
        Ok(Err(e)) => {
            tracing::debug!(domain, server = %server, error = %e, "WHOIS lookup failed");
            DomainStatus::Unregistered
        }
        Err(_) => {
            tracing::debug!(domain, server = %server, "WHOIS lookup timed out");
            DomainStatus::Unregistered
        }
    }
}
