//! Premium membership and the aggregated account view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cart::Cart;
use super::id::{AddressId, UserId};
use super::lenient::null_as_default;

/// Premium membership status from the premium-profile endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumProfile {
    #[serde(alias = "isPremium", default, deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(alias = "validUntil", default)]
    pub valid_until: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PremiumProfile {
    #[must_use]
    pub fn new(is_premium: bool, valid_until: Option<String>) -> Self {
        Self {
            is_premium,
            valid_until,
            extra: Map::new(),
        }
    }

    /// Fields the API sent that have no typed counterpart.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Account overview assembled client-side from the session identifiers,
/// the premium profile, and the current cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    pub user_id: Option<UserId>,
    pub address_id: Option<AddressId>,
    pub premium: PremiumProfile,
    pub cart: Cart,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_premium_defaults() {
        let profile = PremiumProfile::default();
        assert!(!profile.is_premium);
        assert!(profile.valid_until.is_none());
    }

    #[test]
    fn test_premium_accepts_camel_case() {
        let profile: PremiumProfile = serde_json::from_value(json!({
            "isPremium": true,
            "validUntil": "2025-12-31",
            "savings": 12.3
        }))
        .unwrap();

        assert!(profile.is_premium);
        assert_eq!(profile.valid_until.as_deref(), Some("2025-12-31"));
        assert_eq!(profile.extra()["savings"], 12.3);
    }

    #[test]
    fn test_account_with_nested_records() {
        let data = AccountData {
            user_id: Some(UserId::new(123)),
            address_id: Some(AddressId::new(456)),
            premium: PremiumProfile::new(true, Some("2025-12-31".to_owned())),
            cart: Cart::from_items(10.0, false, Vec::new()),
        };

        assert_eq!(data.user_id, Some(UserId::new(123)));
        assert!(data.premium.is_premium);
        assert!((data.cart.total_price - 10.0).abs() < f64::EPSILON);
    }
}
