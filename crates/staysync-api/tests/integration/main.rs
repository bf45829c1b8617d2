//! Integration test entry point for the bookings API client
//!
//! Each module exercises one area of the adapter against a wiremock-based
//! mock of the bookings API.

mod common;
mod test_fetch;
mod test_upload;
