use httpmock::prelude::*;
use libtld_sweep::{expand_tlds, fetch_tlds, load_tld_file, ProbeConfig, Prober, TldError};
use std::time::Duration;

fn prober_for(server: &MockServer) -> Prober {
    Prober::with_config(ProbeConfig {
        timeout: Duration::from_secs(2),
        workers: 10,
        api_base: server.base_url(),
    })
}

#[tokio::test]
async fn fetches_and_filters_tld_list() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/TLD/tlds-alpha-by-domain.txt");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body("# Version 2026082900\nCOM\nNET\nORG\n");
    });

    let client = reqwest::Client::new();
    let tlds = fetch_tlds(&client, &server.url("/TLD/tlds-alpha-by-domain.txt"))
        .await
        .unwrap();

    list_mock.assert();
    assert_eq!(tlds, vec!["com", "net", "org"]);
}

#[tokio::test]
async fn tld_fetch_failure_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tlds.txt");
        then.status(503);
    });

    let client = reqwest::Client::new();
    let err = fetch_tlds(&client, &server.url("/tlds.txt")).await.unwrap_err();
    assert!(matches!(err, TldError::Fetch(_)));
}

#[tokio::test]
async fn sequential_sweep_skips_failed_candidates() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/status")
            .query_param("domain", "example.com")
            .query_param("mashape-key", "test-key")
            .header("X-RapidAPI-Key", "test-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "status": "active" }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/status")
            .query_param("domain", "example.net");
        then.status(500);
    });

    let tlds = vec!["com".to_string(), "net".to_string()];
    let domains: Vec<String> = expand_tlds("example", &tlds).collect();
    assert_eq!(domains, vec!["example.com", "example.net"]);

    let prober = prober_for(&server);
    let results = prober.probe_api_all("test-key", domains).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "example.com");
    assert_eq!(results[0].status.to_string(), "active");
}

#[tokio::test]
async fn missing_status_field_defaults_to_na() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/status");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "message": "ok" }));
    });

    let prober = prober_for(&server);
    let result = prober.probe_api("test-key", "example.com").await.unwrap();
    assert_eq!(result.status.to_string(), "N/A");
}

#[tokio::test]
async fn sequential_sweep_preserves_input_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/status");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "status": "undelegated" }));
    });

    let tlds: Vec<String> = ["com", "net", "org", "io"].iter().map(|s| s.to_string()).collect();
    let domains: Vec<String> = expand_tlds("example", &tlds).collect();

    let prober = prober_for(&server);
    let results = prober.probe_api_all("test-key", domains.clone()).await;

    let probed: Vec<String> = results.into_iter().map(|r| r.domain).collect();
    assert_eq!(probed, domains);
}

#[test]
fn local_tld_file_is_loaded_and_filtered() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# local list").unwrap();
    writeln!(file, "COM").unwrap();
    writeln!(file, "rs").unwrap();
    file.flush().unwrap();

    let tlds = load_tld_file(file.path()).unwrap();
    assert_eq!(tlds, vec!["com", "rs"]);
}
