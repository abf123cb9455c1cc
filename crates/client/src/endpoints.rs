//! Storefront API paths, relative to the configured base URL.

pub const LOGIN: &str = "/services/frontend-service/login";
pub const LOGOUT: &str = "/services/frontend-service/logout";
pub const SEARCH: &str = "/services/frontend-service/search-metadata";
pub const CART: &str = "/services/frontend-service/v2/cart";
pub const TIMESLOTS: &str = "/services/frontend-service/timeslots-api/0";
pub const DELIVERED_ORDERS: &str = "/api/v3/orders/delivered";
pub const UPCOMING_ORDERS: &str = "/api/v3/orders/upcoming";
pub const PREMIUM_PROFILE: &str = "/services/frontend-service/premium/profile";

/// Path of a single order. The id is percent-encoded.
#[must_use]
pub fn order_detail(order_id: &str) -> String {
    format!("/api/v3/orders/{}", urlencoding::encode(order_id))
}
