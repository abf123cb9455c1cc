//! Knuspr storefront API client.
//!
//! Owns the HTTP transport for one session, paces every request, unwraps the
//! response envelope, and maps payloads into [`knuspr_core`] records.

use futures::future::BoxFuture;
use knuspr_core::{
    AccountData, Cart, CartItem, DeliverySlot, Order, PremiumProfile, ProductId, SearchResult,
};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::Authenticator;
use crate::config::KnusprConfig;
use crate::endpoints;
use crate::envelope::{first_message, inner_status, into_payload, list_payload};
use crate::error::KnusprError;
use crate::pacer::Pacer;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const SEC_CH_UA: &str = r#""Google Chrome";v="119", "Chromium";v="119", "Not?A_Brand";v="24""#;

const NOT_INITIALIZED: &str = "Client not initialized. Call connect() or use scoped() first";
const MAX_REDIRECTS: usize = 10;

/// Source tag the storefront expects on add-to-cart requests.
const ADD_TO_CART_SOURCE: &str = "true:Search Results";

/// Page size the storefront's own order history uses.
pub const DEFAULT_ORDER_HISTORY_LIMIT: usize = 50;

/// Quantity the storefront's add button sends.
pub const DEFAULT_ADD_QUANTITY: u32 = 1;

/// Badge slug of sponsored search placements.
const PROMOTED_BADGE: &str = "promoted";

/// Client for the Knuspr storefront API.
///
/// # Lifecycle
///
/// A client starts disconnected. [`KnusprClient::connect`] opens the
/// transport and logs in; [`KnusprClient::close`] logs out and drops the
/// transport. [`KnusprClient::scoped`] wraps both around a closure and
/// closes on every exit path. Domain calls on a disconnected client fail
/// with `KnusprError::Client`.
///
/// # Example
///
/// ```rust,ignore
/// let mut client = KnusprClient::from_env()?;
/// let cart = client
///     .scoped(|client| Box::pin(async move { client.get_cart().await }))
///     .await?;
/// ```
pub struct KnusprClient {
    config: KnusprConfig,
    pacer: Pacer,
    auth: Authenticator,
    http: Option<reqwest::Client>,
}

impl KnusprClient {
    /// Create a disconnected client.
    #[must_use]
    pub fn new(config: KnusprConfig) -> Self {
        Self {
            pacer: Pacer::new(config.min_request_interval),
            auth: Authenticator::from_config(&config),
            http: None,
            config,
        }
    }

    /// Create a disconnected client from `KNUSPR_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError::Config` if a variable doesn't parse.
    pub fn from_env() -> Result<Self, KnusprError> {
        Ok(Self::new(KnusprConfig::from_env()?))
    }

    /// Create a disconnected client for explicit credentials and the
    /// default configuration. The environment is not consulted.
    #[must_use]
    pub fn with_credentials(username: impl Into<String>, password: SecretString) -> Self {
        Self::new(KnusprConfig::default().with_credentials(username, password))
    }

    #[must_use]
    pub const fn config(&self) -> &KnusprConfig {
        &self.config
    }

    /// Session state of the current (or last) login.
    #[must_use]
    pub const fn auth(&self) -> &Authenticator {
        &self.auth
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.http.is_some()
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Open the transport and log in.
    ///
    /// If login fails the transport is dropped again and the client stays
    /// disconnected.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError::Client` if already connected or the transport
    /// can't be built, otherwise any error from [`Authenticator::login`].
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn connect(&mut self) -> Result<(), KnusprError> {
        if self.http.is_some() {
            return Err(KnusprError::Client("Client already connected".to_owned()));
        }

        let http = build_transport(&self.config)?;
        self.auth.login(&http, &self.config.base_url).await?;
        self.http = Some(http);

        debug!("session opened");
        Ok(())
    }

    /// Log out and close the transport. Never fails; a no-op when
    /// disconnected.
    #[instrument(skip(self))]
    pub async fn close(&mut self) {
        if let Some(http) = self.http.take() {
            self.auth.logout(&http, &self.config.base_url).await;
            debug!("session closed");
        }
    }

    /// Run `f` inside a session: connect, run, then close whatever `f`
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the login error (without running `f`), or `f`'s own error.
    pub async fn scoped<T, F>(&mut self, f: F) -> Result<T, KnusprError>
    where
        F: for<'a> FnOnce(&'a mut Self) -> BoxFuture<'a, Result<T, KnusprError>>,
    {
        self.connect().await?;
        let result = f(&mut *self).await;
        self.close().await;
        result
    }

    // =========================================================================
    // Request Pipeline
    // =========================================================================

    /// Pace, send, and unwrap one request.
    #[instrument(skip(self, method, query, body), fields(method = %method))]
    async fn request(
        &mut self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, KnusprError> {
        let Some(http) = self.http.as_ref() else {
            return Err(KnusprError::Client(NOT_INITIALIZED.to_owned()));
        };
        let url = build_url(&self.config.base_url, path, query)?;

        self.pacer.wait().await;

        let mut builder = http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| KnusprError::network(path, e))?;

        handle_response(path, response).await
    }

    async fn get(&mut self, path: &str, query: &[(&str, String)]) -> Result<Value, KnusprError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&mut self, path: &str, body: Value) -> Result<Value, KnusprError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn delete(&mut self, path: &str, query: &[(&str, String)]) -> Result<Value, KnusprError> {
        self.request(Method::DELETE, path, query, None).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Search the catalogue. Sponsored placements are dropped; the remaining
    /// results keep the API's order.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails or a result doesn't parse.
    #[instrument(skip(self))]
    pub async fn search_products(
        &mut self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, KnusprError> {
        let params = [
            ("search", query.to_owned()),
            ("offset", "0".to_owned()),
            ("limit", limit.to_string()),
            ("companyId", "1".to_owned()),
            ("filterData", r#"{"filters":[]}"#.to_owned()),
            ("canCorrect", "true".to_owned()),
        ];
        let payload = self.get(endpoints::SEARCH, &params).await?;

        let entries: Vec<Value> = list_payload(payload, "productList")
            .into_iter()
            .filter(|entry| !is_promoted(entry))
            .collect();
        let results: Vec<SearchResult> = parse_list(entries)?;

        debug!(count = results.len(), "search results");
        Ok(results)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product to the cart. Returns the given product ID. See
    /// [`DEFAULT_ADD_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<ProductId, KnusprError> {
        let body = json!({
            "actionId": null,
            "productId": product_id.as_i64(),
            "quantity": quantity,
            "recipeId": null,
            "source": ADD_TO_CART_SOURCE,
        });
        self.post(endpoints::CART, body).await?;
        Ok(product_id)
    }

    /// Fetch the current cart.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError::MalformedResponse` if the items map is keyed by
    /// something other than numeric product IDs, or any request error.
    #[instrument(skip(self))]
    pub async fn get_cart(&mut self) -> Result<Cart, KnusprError> {
        let payload = self.get(endpoints::CART, &[]).await?;
        let Value::Object(mut data) = payload else {
            return Ok(Cart::default());
        };

        let items = parse_cart_items(data.remove("items"))?;
        let total_price = data
            .remove("totalPrice")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let can_make_order = data
            .remove("canMakeOrder")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        debug!(items = items.len(), "cart fetched");
        Ok(Cart::from_items(total_price, can_make_order, items).with_extra(data))
    }

    /// Remove one cart line by its `order_field_id` (see [`CartItem`]).
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&mut self, order_field_id: &str) -> Result<bool, KnusprError> {
        self.delete(endpoints::CART, &[("orderFieldId", order_field_id.to_owned())])
            .await?;
        Ok(true)
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    /// Delivery slots for the logged-in user's address.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError::Client` if the session has no user or address
    /// ID, checked before any request is made.
    #[instrument(skip(self))]
    pub async fn get_delivery_slots(&mut self) -> Result<Vec<DeliverySlot>, KnusprError> {
        let (Some(user_id), Some(address_id)) = (self.auth.user_id(), self.auth.address_id())
        else {
            return Err(KnusprError::Client(
                "user_id and address_id required. Are you logged in?".to_owned(),
            ));
        };

        let params = [
            ("userId", user_id.to_string()),
            ("addressId", address_id.to_string()),
            ("reasonableDeliveryTime", "true".to_owned()),
        ];
        let payload = self.get(endpoints::TIMESLOTS, &params).await?;
        parse_list(list_payload(payload, "slots"))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Delivered orders, newest first as sent by the API. See
    /// [`DEFAULT_ORDER_HISTORY_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails or an order doesn't parse.
    #[instrument(skip(self))]
    pub async fn get_order_history(
        &mut self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Order>, KnusprError> {
        let params = [("offset", offset.to_string()), ("limit", limit.to_string())];
        let payload = self.get(endpoints::DELIVERED_ORDERS, &params).await?;
        parse_list(list_payload(payload, "orders"))
    }

    /// A single order with its product lines.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails or the order doesn't parse.
    #[instrument(skip(self))]
    pub async fn get_order_detail(&mut self, order_id: &str) -> Result<Order, KnusprError> {
        let payload = self.get(&endpoints::order_detail(order_id), &[]).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Orders not yet delivered.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails or an order doesn't parse.
    #[instrument(skip(self))]
    pub async fn get_upcoming_orders(&mut self) -> Result<Vec<Order>, KnusprError> {
        let payload = self.get(endpoints::UPCOMING_ORDERS, &[]).await?;
        parse_list(list_payload(payload, "orders"))
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Premium membership status.
    ///
    /// # Errors
    ///
    /// Returns `KnusprError` if the request fails or the profile doesn't parse.
    #[instrument(skip(self))]
    pub async fn get_premium_info(&mut self) -> Result<PremiumProfile, KnusprError> {
        let payload = self.get(endpoints::PREMIUM_PROFILE, &[]).await?;
        if payload.is_null() {
            return Ok(PremiumProfile::default());
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Premium status and cart, combined with the session's identifiers.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`KnusprClient::get_premium_info`] or
    /// [`KnusprClient::get_cart`].
    #[instrument(skip(self))]
    pub async fn get_account_data(&mut self) -> Result<AccountData, KnusprError> {
        let premium = self.get_premium_info().await?;
        let cart = self.get_cart().await?;

        Ok(AccountData {
            user_id: self.auth.user_id(),
            address_id: self.auth.address_id(),
            premium,
            cart,
        })
    }
}

impl Drop for KnusprClient {
    fn drop(&mut self) {
        if self.http.is_some() {
            warn!("KnusprClient dropped while connected; session was not logged out");
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn build_transport(config: &KnusprConfig) -> Result<reqwest::Client, KnusprError> {
    reqwest::Client::builder()
        .default_headers(default_headers(config)?)
        .timeout(config.request_timeout)
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| KnusprError::Client(format!("Failed to build HTTP client: {e}")))
}

/// Browser-like headers the storefront expects on every request.
fn default_headers(config: &KnusprConfig) -> Result<HeaderMap, KnusprError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(REFERER, header_value("base_url", &config.base_url)?);
    headers.insert(ORIGIN, header_value("base_url", &config.base_url)?);
    headers.insert(ACCEPT_LANGUAGE, header_value("language", &config.language)?);

    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"macOS\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));

    Ok(headers)
}

fn header_value(setting: &str, value: &str) -> Result<HeaderValue, KnusprError> {
    HeaderValue::from_str(value)
        .map_err(|e| KnusprError::Client(format!("Invalid {setting} for header: {e}")))
}

fn build_url(base_url: &str, path: &str, query: &[(&str, String)]) -> Result<Url, KnusprError> {
    let raw = format!("{base_url}{path}");
    let parsed = if query.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, query)
    };
    parsed.map_err(|e| KnusprError::Client(format!("Invalid URL {raw}: {e}")))
}

/// Map the HTTP status, then the envelope, to a payload or an error.
async fn handle_response(path: &str, response: reqwest::Response) -> Result<Value, KnusprError> {
    let status = response.status();
    debug!(%status, "response received");

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(KnusprError::RateLimited(
            "Rate limit exceeded. Increase min_request_interval.".to_owned(),
        ));
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(KnusprError::Authentication(
            "Session expired or invalid".to_owned(),
        ));
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(KnusprError::Api {
            message: format!("HTTP {status} from {path}"),
            status: Some(i64::from(status.as_u16())),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| KnusprError::network(path, e))?;
    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text)?
    };

    if let Some(inner) = inner_status(&body)
        && inner >= 400
    {
        return Err(KnusprError::Api {
            message: first_message(&body).unwrap_or_else(|| "API error".to_owned()),
            status: Some(inner),
        });
    }

    Ok(into_payload(body))
}

fn parse_list<T: DeserializeOwned>(entries: Vec<Value>) -> Result<Vec<T>, KnusprError> {
    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(KnusprError::from))
        .collect()
}

/// Whether a search entry's badge list marks it as a sponsored placement.
fn is_promoted(entry: &Value) -> bool {
    entry
        .get("badge")
        .and_then(Value::as_array)
        .is_some_and(|badges| {
            badges
                .iter()
                .any(|badge| badge.get("slug").and_then(Value::as_str) == Some(PROMOTED_BADGE))
        })
}

/// Cart items arrive either as a list or as a map keyed by product ID whose
/// values lack their own `productId`.
fn parse_cart_items(raw: Option<Value>) -> Result<Vec<CartItem>, KnusprError> {
    match raw {
        Some(Value::Object(entries)) => entries
            .into_iter()
            .map(|(key, value)| cart_item_from_entry(&key, value))
            .collect(),
        Some(Value::Array(entries)) => parse_list(entries),
        _ => Ok(Vec::new()),
    }
}

fn cart_item_from_entry(key: &str, value: Value) -> Result<CartItem, KnusprError> {
    let product_id: i64 = key.parse().map_err(|_| {
        KnusprError::MalformedResponse(format!(
            "cart item key {key:?} is not a numeric product id"
        ))
    })?;

    let Value::Object(mut fields) = value else {
        return Err(KnusprError::MalformedResponse(format!(
            "cart item {key} is not an object"
        )));
    };
    fields.remove("product_id");
    fields.insert("productId".to_owned(), Value::from(product_id));

    Ok(serde_json::from_value(Value::Object(fields))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_is_promoted() {
        assert!(is_promoted(&json!({"badge": [{"slug": "promoted"}]})));
        assert!(is_promoted(
            &json!({"badge": [{"slug": "bio"}, {"slug": "promoted"}]})
        ));
        assert!(!is_promoted(&json!({"badge": [{"slug": "bio"}]})));
        assert!(!is_promoted(&json!({"badge": "promoted"})));
        assert!(!is_promoted(&json!({})));
    }

    #[test]
    fn test_with_credentials_uses_default_config() {
        let client = KnusprClient::with_credentials("me@example.com", SecretString::from("pw"));
        let defaults = KnusprConfig::default();

        assert_eq!(client.config().username, "me@example.com");
        assert_eq!(client.config().base_url, defaults.base_url);
        assert_eq!(
            client.config().min_request_interval,
            defaults.min_request_interval
        );
        assert!(!client.is_connected());
    }

    #[test]
    fn test_cart_items_from_map_inject_product_id() {
        let raw = json!({
            "1001": {"orderFieldId": "of-1", "productName": "Milk", "quantity": 1, "price": 1.49}
        });
        let items = parse_cart_items(Some(raw)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, ProductId::new(1001));
        assert_eq!(items[0].order_field_id, "of-1");
    }

    #[test]
    fn test_cart_items_from_list() {
        let raw = json!([
            {"orderFieldId": "of-1", "productId": 1001},
            {"orderFieldId": "of-2", "productId": 1002}
        ]);
        let items = parse_cart_items(Some(raw)).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].product_id, ProductId::new(1002));
    }

    #[test]
    fn test_cart_items_non_numeric_key_is_malformed() {
        let raw = json!({"milk": {"orderFieldId": "of-1"}});
        let err = parse_cart_items(Some(raw)).unwrap_err();
        assert!(matches!(err, KnusprError::MalformedResponse(_)));
    }

    #[test]
    fn test_cart_items_missing_is_empty() {
        assert!(parse_cart_items(None).unwrap().is_empty());
        assert!(parse_cart_items(Some(Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn test_build_url_with_query() {
        let url = build_url(
            "https://www.knuspr.de",
            endpoints::SEARCH,
            &[("search", "Bio Milch".to_owned()), ("limit", "10".to_owned())],
        )
        .unwrap();
        assert_eq!(url.path(), endpoints::SEARCH);
        assert_eq!(url.query(), Some("search=Bio+Milch&limit=10"));
    }

    #[test]
    fn test_default_headers() {
        let config = KnusprConfig::default();
        let headers = default_headers(&config).unwrap();
        assert_eq!(headers[ORIGIN], "https://www.knuspr.de");
        assert_eq!(headers[REFERER], "https://www.knuspr.de");
        assert_eq!(headers[ACCEPT_LANGUAGE], crate::config::DEFAULT_LANGUAGE);
        assert!(
            headers[USER_AGENT]
                .to_str()
                .unwrap()
                .starts_with("Mozilla/5.0")
        );
    }

    #[tokio::test]
    async fn test_domain_call_before_connect_fails() {
        let mut client =
            KnusprClient::new(KnusprConfig::default().with_min_request_interval(Duration::ZERO));
        let err = client.search_products("test", 10).await.unwrap_err();
        assert!(matches!(err, KnusprError::Client(ref msg) if msg.starts_with("Client not initialized")));
    }

    #[tokio::test]
    async fn test_delivery_slots_require_session_ids() {
        let mut client = KnusprClient::new(KnusprConfig::default());
        let err = client.get_delivery_slots().await.unwrap_err();
        assert!(matches!(err, KnusprError::Client(ref msg) if msg.contains("user_id and address_id")));
    }

    #[tokio::test]
    async fn test_close_without_connect_is_noop() {
        let mut client = KnusprClient::new(KnusprConfig::default());
        client.close().await;
        assert!(!client.is_connected());
        assert!(!client.auth().is_authenticated());
    }
}
