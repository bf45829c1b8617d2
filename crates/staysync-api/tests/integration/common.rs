//! Shared test helpers for bookings API integration tests
//!
//! Provides wiremock-based mock server setup for the bookings API
//! endpoints. Each helper mounts the necessary mock endpoints and returns
//! a configured `HttpRemoteStore` pointing at the mock server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staysync_api::client::HttpRemoteStore;

/// Starts a mock server and returns it with a client pointed at it.
pub async fn setup_api_mock() -> (MockServer, HttpRemoteStore) {
    let server = MockServer::start().await;
    let client = HttpRemoteStore::new(server.uri(), Duration::from_secs(2))
        .expect("client construction");
    (server, client)
}

/// JSON for one booking record in the API's wire format.
pub fn booking_json(id: &str, status: &str, updated_at: Option<&str>) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": id,
        "status": status,
        "totalAmount": 1250.0,
        "contractSigned": false,
        "customerInfo": {
            "name": "Quinn Harper",
            "phone": "555-0107",
            "email": "quinn@example.com"
        },
        "createdAt": "2025-05-01T09:00:00Z",
    });
    if let Some(updated) = updated_at {
        value["updatedAt"] = serde_json::json!(updated);
    }
    value
}

/// Mounts `GET /api/bookings` returning the given records.
pub async fn mount_bookings(server: &MockServer, bookings: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bookings))
        .mount(server)
        .await;
}

/// Mounts `PUT /api/bookings/{id}` echoing the record with the given status.
#[allow(dead_code)]
pub async fn mount_upload(server: &MockServer, id: &str, status_code: u16) {
    Mock::given(method("PUT"))
        .and(path(format!("/api/bookings/{id}")))
        .respond_with(
            ResponseTemplate::new(status_code)
                .set_body_json(booking_json(id, "reserved", Some("2025-05-02T09:00:00Z"))),
        )
        .mount(server)
        .await;
}
