//! Placed orders.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](resource_actor::ActorEntity) in
//! [`crate::order_actor`]; creation takes an [`OrderDraft`] and the only
//! mutation is a status transition.

use crate::model::{CartLine, OrderId, OrderNumber, OrderStatus, RestaurantId, UserId};
use crate::pricing::PriceBreakdown;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A trimmed, non-empty delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryAddress(String);

impl DeliveryAddress {
    /// Returns `None` for a blank address.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeliveryAddress {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or("delivery address must not be blank")
    }
}

impl From<DeliveryAddress> for String {
    fn from(address: DeliveryAddress) -> Self {
        address.0
    }
}

impl Display for DeliveryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub delivery_address: DeliveryAddress,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_history: Vec<StatusChange>,
}

/// Payload for creating a new order: a validated cart snapshot plus its
/// pricing and checkout details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub lines: Vec<CartLine>,
    pub pricing: PriceBreakdown,
    pub delivery_address: DeliveryAddress,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl Order {
    /// Builds a `Pending` order with an empty history.
    pub fn from_draft(id: OrderId, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: OrderNumber::for_order(id),
            customer_id: draft.customer_id,
            restaurant_id: draft.restaurant_id,
            lines: draft.lines,
            subtotal: draft.pricing.subtotal,
            delivery_fee: draft.pricing.delivery_fee,
            service_fee: draft.pricing.service_fee,
            total: draft.pricing.total,
            status: OrderStatus::Pending,
            delivery_address: draft.delivery_address,
            payment_method: draft.payment_method,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            status_history: Vec::new(),
        }
    }
}
