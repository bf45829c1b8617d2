//! Integration tests for snapshot fetching
//!
//! Verifies deserialization of the bookings wire format and error mapping
//! for unreachable or failing endpoints.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staysync_api::client::HttpRemoteStore;
use staysync_core::domain::booking::BookingStatus;
use staysync_core::ports::remote_store::IRemoteStore;

use crate::common;

#[tokio::test]
async fn test_fetch_all_returns_bookings() {
    let (server, client) = common::setup_api_mock().await;

    common::mount_bookings(
        &server,
        serde_json::json!([
            common::booking_json("B1", "reserved", Some("2025-05-02T09:00:00Z")),
            common::booking_json("B2", "cancelled", None),
        ]),
    )
    .await;

    let bookings = client.fetch_all().await.expect("fetch failed");

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].id().as_str(), "B1");
    assert_eq!(bookings[0].status(), BookingStatus::Reserved);
    assert_eq!(bookings[0].customer_info().unwrap().name, "Quinn Harper");
    // B2 was never mutated; its resolution timestamp is createdAt.
    assert_eq!(bookings[1].modified_at(), bookings[1].created_at());
}

#[tokio::test]
async fn test_fetch_all_empty_snapshot() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_bookings(&server, serde_json::json!([])).await;

    let bookings = client.fetch_all().await.expect("fetch failed");
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn test_fetch_all_server_error() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(client.fetch_all().await.is_err());
}

#[tokio::test]
async fn test_fetch_all_invalid_body() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(client.fetch_all().await.is_err());
}

#[tokio::test]
async fn test_fetch_all_times_out_on_slow_server() {
    let server = MockServer::start().await;
    let client =
        HttpRemoteStore::new(server.uri(), Duration::from_millis(200)).expect("client");

    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    assert!(client.fetch_all().await.is_err());
}

#[tokio::test]
async fn test_ping_health_endpoint() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client.ping().await);
}

#[tokio::test]
async fn test_ping_unreachable_is_false() {
    let client = HttpRemoteStore::new(
        "http://127.0.0.1:1", // nothing listens here
        Duration::from_millis(200),
    )
    .expect("client");

    assert!(!client.ping().await);
}
