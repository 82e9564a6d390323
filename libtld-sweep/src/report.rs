use crate::types::ProbeResult;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Render results as repeated `Domain:`/`Status:` blocks separated by a
/// blank line. Used for both console output and the TXT file format.
pub fn render_txt(results: &[ProbeResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&format!("Domain: {}\nStatus: {}\n\n", result.domain, result.status));
    }
    out
}

pub fn write_txt<W: Write>(mut writer: W, results: &[ProbeResult]) -> Result<(), ReportError> {
    writer.write_all(render_txt(results).as_bytes())?;
    Ok(())
}

/// Write a `Domain,Status` header followed by one row per result.
pub fn write_csv<W: Write>(writer: W, results: &[ProbeResult]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Domain", "Status"])?;
    for result in results {
        let status = result.status.to_string();
        csv_writer.write_record([result.domain.as_str(), status.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainStatus;
    use std::time::Duration;

    fn sample_results() -> Vec<ProbeResult> {
        vec![
            ProbeResult {
                domain: "example.com".to_string(),
                status: DomainStatus::Provider("active".to_string()),
                duration: Duration::from_millis(12),
            },
            ProbeResult {
                domain: "example.net".to_string(),
                status: DomainStatus::Unregistered,
                duration: Duration::from_millis(30),
            },
        ]
    }

    #[test]
    fn txt_blocks_are_blank_line_separated() {
        let rendered = render_txt(&sample_results());
        assert_eq!(
            rendered,
            "Domain: example.com\nStatus: active\n\nDomain: example.net\nStatus: unregistered\n\n"
        );
    }

    #[test]
    fn csv_round_trips_domain_status_pairs() {
        let results = sample_results();
        let mut buf = Vec::new();
        write_csv(&mut buf, &results).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(vec!["Domain", "Status"])
        );

        let rows: Vec<(String, String)> = reader
            .records()
            .map(|record| {
                let record = record.unwrap();
                (record[0].to_string(), record[1].to_string())
            })
            .collect();

        let expected: Vec<(String, String)> = results
            .iter()
            .map(|r| (r.domain.clone(), r.status.to_string()))
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn empty_results_produce_header_only_csv() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Domain,Status\n");
    }
}
