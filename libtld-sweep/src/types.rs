use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://domainr.p.rapidapi.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainStatus {
    /// Status string as reported by the status API ("active", "undelegated", ...).
    Provider(String),
    Registered,
    Unregistered,
}

impl DomainStatus {
    pub fn is_registered(&self) -> bool {
        matches!(self, DomainStatus::Registered)
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, DomainStatus::Unregistered)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Provider(s) => f.write_str(s),
            DomainStatus::Registered => f.write_str("registered"),
            DomainStatus::Unregistered => f.write_str("unregistered"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub domain: String,
    pub status: DomainStatus,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    /// Width of the concurrent WHOIS fan-out, independent of input length.
    pub workers: usize,
    /// Base URL of the status API.
    pub api_base: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            workers: 10,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}
