//! Integration tests for the BIG-IP management client.
//!
//! Tests run against a `wiremock` server standing in for the management
//! endpoint, so no appliance is needed. Set `RUST_LOG=bigip_client=debug` to
//! see the requests the client issues.

use bigip_client::{BigIpClient, FixedClock, Scheme, SessionConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Once;
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// User the mock endpoint expects.
pub const TEST_USER: &str = "admin";

/// Password the mock endpoint expects.
pub const TEST_PASSWORD: &str = "secret";

/// Installs a fmt subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Instant the test clock is frozen at.
#[must_use]
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Mock management endpoint.
pub struct MockBigIp {
    /// Underlying mock server.
    pub server: MockServer,
}

impl MockBigIp {
    /// Starts a mock endpoint.
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Creates a client pointed at the mock endpoint, with a frozen clock.
    ///
    /// # Errors
    /// Returns error if client creation fails.
    pub fn client(&self) -> Result<BigIpClient, bigip_client::Error> {
        let config = SessionConfig::new(
            &self.server.address().to_string(),
            TEST_USER,
            TEST_PASSWORD,
        )
        .with_scheme(Scheme::Http);

        Ok(BigIpClient::with_config(config)?.with_clock(FixedClock(test_time())))
    }

    /// Full request path for an API path relative to the REST root.
    #[must_use]
    pub fn api_path(relative: &str) -> String {
        format!("{}{}", bigip_client::API_PREFIX, relative)
    }

    /// Responds to an authenticated `GET` of `relative` with `status` and `body`.
    pub async fn mock_get(&self, relative: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(Self::api_path(relative)))
            .and(basic_auth(TEST_USER, TEST_PASSWORD))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Responds to an authenticated JSON `POST` of `relative` by echoing
    /// `echo` with `status`.
    pub async fn mock_post(&self, relative: &str, status: u16, echo: Value) {
        Mock::given(method("POST"))
            .and(path(Self::api_path(relative)))
            .and(basic_auth(TEST_USER, TEST_PASSWORD))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(echo))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Body of the single request received so far.
    ///
    /// Returns `Value::Null` if there is not exactly one request or its body is
    /// not JSON.
    pub async fn only_request_body(&self) -> Value {
        let requests = self.server.received_requests().await.unwrap_or_default();
        match requests.as_slice() {
            [request] => serde_json::from_slice(&request.body).unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or_default()
    }
}

/// 404 body in the shape the management API returns.
#[must_use]
pub fn not_found_body(what: &str) -> Value {
    serde_json::json!({
        "code": 404,
        "message": format!("01020036:3: The requested {} was not found.", what),
        "errorStack": []
    })
}
