//! Integration tests for booking uploads
//!
//! Verifies the create/update distinction carried by the upload receipt
//! and error mapping for rejected records.

use wiremock::matchers::{body_json_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staysync_core::domain::booking::{Booking, BookingStatus};
use staysync_core::domain::newtypes::BookingId;
use staysync_core::ports::remote_store::IRemoteStore;

use crate::common;

fn booking(id: &str) -> Booking {
    Booking::new(BookingId::new(id).unwrap(), BookingStatus::Reserved, 1250.0)
}

#[tokio::test]
async fn test_upload_created_receipt() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_upload(&server, "B1", 201).await;

    let receipt = client.upload(&booking("B1")).await.expect("upload failed");

    assert!(receipt.created);
    assert_eq!(receipt.booking.id().as_str(), "B1");
}

#[tokio::test]
async fn test_upload_updated_receipt() {
    let (server, client) = common::setup_api_mock().await;
    common::mount_upload(&server, "B1", 200).await;

    let receipt = client.upload(&booking("B1")).await.expect("upload failed");

    assert!(!receipt.created);
}

#[tokio::test]
async fn test_upload_returns_accepted_record() {
    // The API may normalize the record; the receipt carries the API's copy.
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("PUT"))
        .and(path("/api/bookings/B1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::booking_json(
            "B1",
            "leased",
            Some("2025-05-03T12:00:00Z"),
        )))
        .mount(&server)
        .await;

    let receipt = client.upload(&booking("B1")).await.expect("upload failed");
    assert_eq!(receipt.booking.status(), BookingStatus::Leased);
}

#[tokio::test]
async fn test_upload_sends_wire_format_body() {
    let (server, client) = common::setup_api_mock().await;

    let record = booking("B1");
    let expected = serde_json::to_string(&record).unwrap();

    Mock::given(method("PUT"))
        .and(path("/api/bookings/B1"))
        .and(body_json_string(&expected))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::to_value(&record).unwrap()),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.upload(&record).await.expect("upload failed");
}

#[tokio::test]
async fn test_upload_rejected_record_is_an_error() {
    let (server, client) = common::setup_api_mock().await;

    Mock::given(method("PUT"))
        .and(path("/api/bookings/B1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("totalAmount out of range"))
        .mount(&server)
        .await;

    assert!(client.upload(&booking("B1")).await.is_err());
}

#[tokio::test]
async fn test_upload_server_error_is_an_error() {
    let server = MockServer::start().await;
    let client = staysync_api::client::HttpRemoteStore::new(
        server.uri(),
        std::time::Duration::from_secs(2),
    )
    .expect("client");

    Mock::given(method("PUT"))
        .and(path("/api/bookings/B1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.upload(&booking("B1")).await.is_err());
}
