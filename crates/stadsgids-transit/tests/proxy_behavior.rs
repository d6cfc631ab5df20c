//! Proxy behavior tests against a local single-shot HTTP stub.
//!
//! Run with: `cargo test -p stadsgids-transit --test proxy_behavior`

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Test code: panics are acceptable for test failures"
)]

use std::time::Duration;

use stadsgids_core::TransitConfig;
use stadsgids_transit::{ScheduleSelector, TransitClient, TransitError};
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpListener;

/// Serve exactly one connection with a canned HTTP response, then close.
/// Returns the base URL to point the client at.
async fn serve_once(status_line: &str, content_type: &str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();

    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0_u8; 2048];
            drop(socket.read(&mut request).await);
            drop(socket.write_all(response.as_bytes()).await);
            drop(socket.shutdown().await);
        }
    });

    format!("http://127.0.0.1:{port}")
}

/// Accept one connection and never answer, to force a client-side timeout.
async fn serve_hung() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();

    tokio::spawn(async move {
        if let Ok((_socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn config_for(base_url: String) -> TransitConfig {
    TransitConfig {
        api_key: Some("test-subscription-key".to_owned()),
        base_url,
        area: "Gent".to_owned(),
        request_timeout: Duration::from_millis(500),
    }
}

#[tokio::test]
async fn disruptions_are_fetched_and_formatted() {
    let base_url = serve_once(
        "200 OK",
        "application/json",
        r#"{
            "interruptions": [
                {"type": "Interruption", "details": "Tram 4 suspended near Korenmarkt."}
            ],
            "detours": [
                {"type": "Detour", "details": "Bus 5 rerouted via Zuid."}
            ]
        }"#
        .to_owned(),
    )
    .await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let report = client.disruptions(None).await.expect("lookup succeeds");

    assert_eq!(
        report.disruptions,
        vec![
            "Interruption: Tram 4 suspended near Korenmarkt.",
            "Detour: Bus 5 rerouted via Zuid."
        ]
    );
    assert!(report.message.is_none());
}

#[tokio::test]
async fn empty_disruptions_carry_a_filter_aware_message() {
    let base_url = serve_once("200 OK", "application/json", "{}".to_owned()).await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let report = client
        .disruptions(Some("tram 1"))
        .await
        .expect("lookup succeeds");

    assert!(report.disruptions.is_empty());
    assert_eq!(
        report.message.as_deref(),
        Some("No current disruptions reported for Gent matching filter: 'tram 1'.")
    );
}

#[tokio::test]
async fn schedule_is_fetched_and_formatted() {
    let base_url = serve_once(
        "200 OK",
        "application/json",
        r#"{
            "departures": [
                {"line": "1", "time": "14:32", "direction": "Flanders Expo"},
                {"line": "4", "time": "14:40", "direction": "UZ Gent"}
            ]
        }"#
        .to_owned(),
    )
    .await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let selector = ScheduleSelector::Stop("Korenmarkt".to_owned());
    let board = client.schedule(&selector).await.expect("lookup succeeds");

    assert_eq!(
        board.departures,
        vec![
            "Line 1 at 14:32 towards Flanders Expo",
            "Line 4 at 14:40 towards UZ Gent"
        ]
    );
    assert!(board.message.is_none());
}

#[tokio::test]
async fn upstream_auth_failure_passes_the_status_through() {
    let base_url = serve_once("401 Unauthorized", "text/plain", "bad key".to_owned()).await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let proxy_error = client.disruptions(None).await.expect_err("lookup fails");

    assert_eq!(proxy_error.status_code(), 401);
    assert!(proxy_error.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn upstream_outage_maps_to_a_temporary_trouble_message() {
    let base_url = serve_once(
        "503 Service Unavailable",
        "text/plain",
        "upstream down".to_owned(),
    )
    .await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let selector = ScheduleSelector::Line("1".to_owned());
    let proxy_error = client.schedule(&selector).await.expect_err("lookup fails");

    assert_eq!(proxy_error.status_code(), 503);
    assert!(proxy_error.to_string().contains("temporary issues"));
}

#[tokio::test]
async fn hung_upstream_becomes_a_gateway_timeout() {
    let base_url = serve_hung().await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let proxy_error = client.disruptions(None).await.expect_err("lookup fails");

    assert_eq!(proxy_error, TransitError::Timeout);
    assert_eq!(proxy_error.status_code(), 504);
}

#[tokio::test]
async fn unreachable_upstream_becomes_a_bad_gateway() {
    // Bind to learn a free port, then drop the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();
    drop(listener);

    let client =
        TransitClient::new(&config_for(format!("http://127.0.0.1:{port}"))).expect("client builds");
    let proxy_error = client.disruptions(None).await.expect_err("lookup fails");

    assert_eq!(proxy_error, TransitError::Connect);
    assert_eq!(proxy_error.status_code(), 502);
}

#[tokio::test]
async fn malformed_upstream_payload_is_a_bad_gateway() {
    let base_url = serve_once("200 OK", "application/json", "{not json".to_owned()).await;

    let client = TransitClient::new(&config_for(base_url)).expect("client builds");
    let proxy_error = client.disruptions(None).await.expect_err("lookup fails");

    assert_eq!(proxy_error, TransitError::MalformedPayload);
    assert_eq!(proxy_error.status_code(), 502);
}
