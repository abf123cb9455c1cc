//! Shopping cart records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::lenient::null_as_default;

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Server-assigned token for this cart line. Required to remove it;
    /// not the same as the product ID.
    #[serde(alias = "order_field_id")]
    pub order_field_id: String,
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    #[serde(alias = "product_name", default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    /// Line price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Primary category name, e.g. "Milch".
    #[serde(
        rename = "primaryCategoryName",
        alias = "primary_category_name",
        default,
        deserialize_with = "null_as_default"
    )]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CartItem {
    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

const TYPED_CART_KEYS: &[&str] = &[
    "totalPrice",
    "total_price",
    "totalItems",
    "total_items",
    "canMakeOrder",
    "can_make_order",
    "items",
];

/// Cart snapshot assembled from the cart endpoint.
///
/// `total_items` is always the number of parsed lines; the server's own
/// count is not trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    pub total_price: f64,
    pub total_items: usize,
    pub can_make_order: bool,
    pub items: Vec<CartItem>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Cart {
    /// Build a cart from its lines; `total_items` is derived from `items`.
    #[must_use]
    pub fn from_items(total_price: f64, can_make_order: bool, items: Vec<CartItem>) -> Self {
        Self {
            total_price,
            total_items: items.len(),
            can_make_order,
            items,
            extra: Map::new(),
        }
    }

    /// Attach the cart payload's remaining fields.
    ///
    /// Keys that name a typed field are dropped so serialization never
    /// writes them twice.
    #[must_use]
    pub fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        for key in TYPED_CART_KEYS {
            extra.remove(*key);
        }
        self.extra = extra;
        self
    }

    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn milk() -> CartItem {
        serde_json::from_value(json!({
            "orderFieldId": "of-abc-123",
            "productId": 1001,
            "productName": "Bio Vollmilch",
            "quantity": 2,
            "price": 2.98,
            "primaryCategoryName": "Milch",
            "brand": "BGL",
            "priceComposition": {"unit": 1.49}
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_cart_item() {
        let item = milk();
        assert_eq!(item.order_field_id, "of-abc-123");
        assert_eq!(item.product_id, ProductId::new(1001));
        assert_eq!(item.product_name, "Bio Vollmilch");
        assert_eq!(item.quantity, 2);
        assert!((item.price - 2.98).abs() < f64::EPSILON);
        assert_eq!(item.category, "Milch");
        assert_eq!(item.extra()["priceComposition"]["unit"], 1.49);
    }

    #[test]
    fn test_cart_item_requires_order_field_id() {
        let result = serde_json::from_value::<CartItem>(json!({"productId": 1001}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::default();
        assert!(cart.total_price.abs() < f64::EPSILON);
        assert_eq!(cart.total_items, 0);
        assert!(!cart.can_make_order);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_items_follows_items() {
        let cart = Cart::from_items(4.27, true, vec![milk(), milk()]);
        assert_eq!(cart.total_items, 2);
        assert!(cart.can_make_order);
    }

    #[test]
    fn test_extra_cannot_override_item_count() {
        let extra = json!({"totalItems": 99, "total_items": 98, "cartId": 7})
            .as_object()
            .cloned()
            .unwrap();
        let cart = Cart::from_items(1.49, true, vec![milk()]).with_extra(extra);

        assert_eq!(cart.extra().len(), 1);
        assert_eq!(cart.extra()["cartId"], 7);
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["totalItems"], 1);
        assert!(value.get("total_items").is_none());
    }
}
