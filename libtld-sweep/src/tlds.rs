use std::path::{Path, PathBuf};

use reqwest::Client;
use thiserror::Error;

pub const IANA_TLD_LIST_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

#[derive(Debug, Error)]
pub enum TldError {
    #[error("Failed to fetch TLD list: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("TLD file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read TLD file: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch a plain-text TLD list from `url`, one token per line.
///
/// A non-success HTTP status or transport failure is fatal; no retry.
pub async fn fetch_tlds(client: &Client, url: &str) -> Result<Vec<String>, TldError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(filter_tld_lines(&body))
}

/// Read a TLD list in the same format from a local file.
pub fn load_tld_file(path: &Path) -> Result<Vec<String>, TldError> {
    if !path.exists() {
        return Err(TldError::NotFound(path.to_path_buf()));
    }
    let body = std::fs::read_to_string(path)?;
    Ok(filter_tld_lines(&body))
}

/// Drop comment (`#`) and blank lines, trim and lowercase the rest.
///
/// The IANA header line is itself a comment, so no separate header skip
/// is needed. Idempotent.
pub fn filter_tld_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim())
        .filter(|line| !line.starts_with('#') && !line.is_empty())
        .map(|line| line.to_lowercase())
        .collect()
}

pub fn expand_tlds<'a>(name: &'a str, tlds: &'a [String]) -> impl Iterator<Item = String> + 'a {
    tlds.iter().map(move |tld| format!("{}.{}", name, tld))
}
