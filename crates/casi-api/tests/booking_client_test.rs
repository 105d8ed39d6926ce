// Integration tests for `BookingClient` using wiremock.

use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casi_api::auth::DEFAULT_API_KEY;
use casi_api::transport::TransportConfig;
use casi_api::{BookingClient, Credentials, Error, TimeRange};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(server: &MockServer) -> BookingClient {
    let url = server.uri().parse().expect("mock server URL is valid");
    BookingClient::new(
        url,
        Some(Credentials::new("driver", "hunter2")),
        &TransportConfig::default(),
    )
    .expect("client builds")
}

fn token_body(expiry: chrono::DateTime<Utc>) -> serde_json::Value {
    json!({
        "id": "tok-1",
        "customerId": "cust-1",
        "expiry": expiry.to_rfc3339(),
        "timeout": expiry.to_rfc3339(),
    })
}

async fn mount_token(server: &MockServer, expiry: chrono::DateTime<Utc>, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/tokens"))
        .and(query_param("expand", "customerId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(expiry)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn sample_bookings() -> serde_json::Value {
    json!([
        {
            "id": "b-1",
            "timeRange": { "start": "2024-03-01T10:00:00Z", "end": "2024-03-01T12:00:00Z" },
            "distance": 15000,
            "cancelled": false,
            "billingState": "DELIVERED"
        }
    ])
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn login_sends_default_api_key_and_provider() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .and(query_param("expand", "customerId"))
        .and(header("X-API-Key", DEFAULT_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(Utc::now() + Duration::hours(1))))
        .expect(1)
        .mount(&server)
        .await;

    let token = client
        .login(&Credentials::new("driver", "hunter2"))
        .await
        .expect("login succeeds");

    assert_eq!(token.id, "tok-1");
    assert_eq!(token.customer_id, "cust-1");
}

#[tokio::test]
async fn login_rejection_is_an_auth_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let result = client.login(&Credentials::new("driver", "wrong")).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication, got: {result:?}"
    );
}

#[tokio::test]
async fn login_malformed_payload_is_an_auth_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    // 2xx but missing customerId and expiry.
    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "tok-1" })))
        .mount(&server)
        .await;

    let result = client.login(&Credentials::new("driver", "hunter2")).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication, got: {result:?}"
    );
}

// ── Token lifecycle ─────────────────────────────────────────────────

#[tokio::test]
async fn two_fetches_inside_validity_log_in_once() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_bookings()))
        .expect(2)
        .mount(&server)
        .await;

    let range = BookingClient::max_range();
    client.bookings(range, false).await.expect("first fetch");
    client.bookings(range, false).await.expect("second fetch");
}

#[tokio::test]
async fn expired_token_is_renewed_per_fetch() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    // Every issued token is already expired, so each fetch logs in again.
    mount_token(&server, Utc::now() - Duration::hours(1), 2).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let range = BookingClient::max_range();
    client.bookings(range, false).await.expect("first fetch");
    client.bookings(range, false).await.expect("second fetch");
}

#[tokio::test]
async fn replacing_credentials_keeps_live_token() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let range = BookingClient::max_range();
    client.bookings(range, false).await.expect("first fetch");

    // Rotation does not invalidate the issued token -- still one login.
    client.set_credentials(Credentials::new("other", "secret"));
    client.bookings(range, false).await.expect("second fetch");
}

#[tokio::test]
async fn missing_credentials_fail_before_the_wire() {
    let server = MockServer::start().await;
    let url = server.uri().parse().expect("mock server URL is valid");
    let client =
        BookingClient::new(url, None, &TransportConfig::default()).expect("client builds");

    let result = client.bookings(BookingClient::max_range(), false).await;
    assert!(
        matches!(result, Err(Error::CredentialsMissing)),
        "expected CredentialsMissing, got: {result:?}"
    );
    assert!(server.received_requests().await.expect("requests recorded").is_empty());
}

// ── Booking queries ─────────────────────────────────────────────────

#[tokio::test]
async fn bookings_use_token_as_basic_auth_with_end_and_sort() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    let range = BookingClient::max_range();
    let end_param = range.end.to_rfc3339_opts(SecondsFormat::Millis, true);

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .and(basic_auth("tok-1", "cust-1"))
        .and(query_param("end", end_param))
        .and(query_param("sort", "timeRange.start,timeRange.end,id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_bookings()))
        .expect(1)
        .mount(&server)
        .await;

    let bookings = client.bookings(range, false).await.expect("fetch succeeds");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, "b-1");
    assert_eq!(bookings[0].distance, 15000.0);
}

#[tokio::test]
async fn out_of_window_range_never_reaches_the_bookings_endpoint() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    // The token is acquired before validation runs.
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let max = BookingClient::max_range();
    let too_old = TimeRange::new(max.start - Duration::days(30), max.end);
    let result = client.bookings(too_old, false).await;
    assert!(
        matches!(result, Err(Error::RangeValidation { .. })),
        "expected RangeValidation, got: {result:?}"
    );
}

#[tokio::test]
async fn skip_validation_allows_out_of_window_ranges() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let max = BookingClient::max_range();
    let too_old = TimeRange::new(max.start - Duration::days(30), max.end);
    client
        .bookings(too_old, true)
        .await
        .expect("validation skipped");
}

#[tokio::test]
async fn server_error_surfaces_as_remote() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.bookings(BookingClient::max_range(), false).await;
    match result {
        Err(Error::Remote { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Remote error, got: {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    let url = server.uri().parse().expect("mock server URL is valid");
    let client = BookingClient::new(
        url,
        Some(Credentials::new("driver", "hunter2")),
        &TransportConfig {
            timeout: std::time::Duration::from_millis(100),
        },
    )
    .expect("client builds");

    mount_token(&server, Utc::now() + Duration::hours(1), 1).await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = client.bookings(BookingClient::max_range(), false).await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}
