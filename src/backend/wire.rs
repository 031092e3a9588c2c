//! JSON bodies and headers shared by the REST routes and the HTTP client.

use crate::model::{CartLine, OrderStatus, RestaurantId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placing identity, set by the upstream auth collaborator.
pub const USER_HEADER: &str = "x-user-id";
/// `admin` for fulfillment staff; anything else is a customer.
pub const ROLE_HEADER: &str = "x-user-role";

/// `POST /orders`. Pricing is recomputed server-side from `lines` and the
/// fees; a missing fee takes the server's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderBody {
    pub restaurant_id: RestaurantId,
    pub lines: Vec<CartLine>,
    pub delivery_address: String,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee: Option<Decimal>,
}

/// `PUT /orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StatusBody {
    pub status: OrderStatus,
    /// When absent, the change is checked against the status read on arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `PUT /orders/{id}/cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /orders` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Admin-only narrowing to one customer.
    pub customer: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `invalid_transition`.
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempted: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_rejects_unknown_fields() {
        let json = serde_json::json!({
            "restaurantId": "r1",
            "lines": [],
            "deliveryAddress": "1 Main St",
            "paymentMethod": "card",
            "deliveryFee": "10.00",
            "serviceFee": "5.00",
            "total": "0.01"
        });
        let err = serde_json::from_value::<CreateOrderBody>(json).unwrap_err();
        assert!(err.to_string().contains("unknown field `total`"));
    }

    #[test]
    fn test_status_body_uses_canonical_statuses() {
        let body: StatusBody =
            serde_json::from_str(r#"{"status":"on-the-way","expectedStatus":"preparing"}"#)
                .unwrap();
        assert_eq!(body.status, OrderStatus::OnTheWay);
        assert_eq!(body.expected_status, Some(OrderStatus::Preparing));
        assert!(serde_json::from_str::<StatusBody>(r#"{"status":"on_the_way"}"#).is_err());
    }
}
