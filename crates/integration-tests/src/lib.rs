//! Integration tests for the Knuspr client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p knuspr-integration-tests
//! ```
//!
//! Every test starts its own `wiremock` server standing in for the
//! storefront, so no network access or real account is needed.
//!
//! # Test Categories
//!
//! - `auth` - Login, logout and scoped sessions
//! - `products` - Product search
//! - `cart` - Cart listing, add and remove
//! - `delivery` - Delivery slots
//! - `orders` - Order history, detail and upcoming orders
//! - `account` - Premium profile and the combined account view
//! - `errors` - HTTP and envelope error mapping

use std::net::TcpListener;
use std::time::Duration;

use knuspr_client::{KnusprClient, KnusprConfig};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use knuspr_client::endpoints;

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "test_password";
pub const TEST_USER_ID: i64 = 12345;
pub const TEST_ADDRESS_ID: i64 = 67890;

/// Login response carrying [`TEST_USER_ID`] and [`TEST_ADDRESS_ID`].
#[must_use]
pub fn login_success_body() -> Value {
    json!({
        "status": 200,
        "data": {
            "user": {"id": TEST_USER_ID, "name": "Test User"},
            "address": {"id": TEST_ADDRESS_ID}
        },
        "messages": []
    })
}

/// Wrap `data` the way most storefront endpoints do.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({"status": 200, "data": data, "messages": []})
}

/// Configuration pointing at `base_url`, with pacing disabled.
#[must_use]
pub fn test_config(base_url: &str) -> KnusprConfig {
    KnusprConfig::default()
        .with_credentials(TEST_EMAIL, SecretString::from(TEST_PASSWORD))
        .with_base_url(base_url)
        .with_min_request_interval(Duration::ZERO)
        .with_request_timeout(Duration::from_secs(5))
}

pub async fn mount_login(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoints::LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_logout(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(endpoints::LOGOUT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200})))
        .mount(server)
        .await;
}

/// Mock storefront that accepts the test credentials and logs out cleanly.
pub async fn storefront() -> MockServer {
    let server = MockServer::start().await;
    mount_login(&server, login_success_body()).await;
    mount_logout(&server).await;
    server
}

/// Client already logged in against `server`.
///
/// # Panics
///
/// Panics if login against the mock fails.
pub async fn connected_client(server: &MockServer) -> KnusprClient {
    let mut client = KnusprClient::new(test_config(&server.uri()));
    client
        .connect()
        .await
        .expect("login against mock storefront should succeed");
    client
}

/// Base URL of a local port nothing is listening on.
///
/// # Panics
///
/// Panics if no ephemeral port can be bound.
#[must_use]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}")
}
