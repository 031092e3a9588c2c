//! # Order Backend
//!
//! [`OrderBackend`] is where placed orders live. The storefront only talks to
//! this trait; two implementations exist:
//!
//! - [`OrderClient`](crate::clients::OrderClient): in-process, backed by the
//!   order actor.
//! - [`HttpOrderBackend`]: a REST client for the routes in [`crate::api`].

pub mod http;
pub mod wire;

pub use http::HttpOrderBackend;

use crate::model::{Order, OrderDraft, OrderId, OrderStatus, UserId};
use crate::order_actor::InvalidTransition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use thiserror::Error;

/// Page size used by the admin orders tab.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The backend refused the request as malformed.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("not permitted: {0}")]
    Forbidden(String),

    /// The backend could not be reached or failed internally.
    #[error("order backend unavailable: {0}")]
    Unavailable(String),
}

/// A status change requested by fulfillment staff.
///
/// Every request names the status the caller saw. The backend applies it only
/// if the order is still in that status, so two operators acting on the same
/// order cannot both win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub target: OrderStatus,
    pub expected: OrderStatus,
    pub reason: Option<String>,
}

impl TransitionRequest {
    pub fn new(expected: OrderStatus, target: OrderStatus) -> Self {
        Self {
            target,
            expected,
            reason: None,
        }
    }

    /// Moves `order` on from the status it was read in.
    pub fn from_order(order: &Order, target: OrderStatus) -> Self {
        Self::new(order.status, target)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Filter and paging for order listings. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub customer: Option<UserId>,
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            customer: None,
            status: None,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl OrderQuery {
    pub fn for_customer(customer: impl Into<UserId>) -> Self {
        Self {
            customer: Some(customer.into()),
            ..Self::default()
        }
    }

    /// Filters, sorts newest first and cuts out the requested page.
    ///
    /// Page `0` is read as page 1 and `per_page` is at least 1.
    pub fn apply(&self, orders: Vec<Order>) -> OrderPage {
        let page = self.page.max(1);
        let per_page = self.per_page.max(1);

        let mut matching: Vec<Order> = orders
            .into_iter()
            .filter(|o| self.customer.as_ref().is_none_or(|c| &o.customer_id == c))
            .filter(|o| self.status.is_none_or(|s| o.status == s))
            .collect();
        matching.sort_by_key(|o| Reverse((o.created_at, o.id)));

        let total = matching.len();
        let orders = matching
            .into_iter()
            .skip((page as usize - 1) * per_page as usize)
            .take(per_page as usize)
            .collect();

        OrderPage {
            orders,
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page as usize) as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

/// Persistence and fulfillment operations on placed orders.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Persists a new order in `Pending`.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, BackendError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, BackendError>;

    async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, BackendError>;

    /// Admin status change.
    async fn transition(
        &self,
        id: OrderId,
        request: TransitionRequest,
    ) -> Result<Order, BackendError>;

    /// Cancellation by the customer who placed the order.
    async fn cancel_order(
        &self,
        id: OrderId,
        customer: UserId,
        reason: Option<String>,
    ) -> Result<Order, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliveryAddress;
    use crate::pricing::PriceBreakdown;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn order(id: u32, customer: &str, status: OrderStatus) -> Order {
        let draft = OrderDraft {
            customer_id: customer.into(),
            restaurant_id: "r1".into(),
            lines: Vec::new(),
            pricing: PriceBreakdown {
                subtotal: Decimal::ZERO,
                delivery_fee: Decimal::ZERO,
                service_fee: Decimal::ZERO,
                total: Decimal::ZERO,
            },
            delivery_address: DeliveryAddress::parse("1 Main St").unwrap(),
            payment_method: "card".into(),
            notes: None,
        };
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let mut order = Order::from_draft(OrderId(id), draft, base + Duration::minutes(id as i64));
        order.status = status;
        order
    }

    #[test]
    fn test_newest_first_with_filters() {
        let orders = vec![
            order(1, "alice", OrderStatus::Pending),
            order(2, "bob", OrderStatus::Pending),
            order(3, "alice", OrderStatus::Delivered),
            order(4, "alice", OrderStatus::Pending),
        ];

        let page = OrderQuery::for_customer("alice").apply(orders.clone());
        let ids: Vec<u32> = page.orders.iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![4, 3, 1]);

        let page = OrderQuery {
            status: Some(OrderStatus::Pending),
            ..OrderQuery::default()
        }
        .apply(orders);
        let ids: Vec<u32> = page.orders.iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_pagination() {
        let orders: Vec<Order> = (1..=32)
            .map(|id| order(id, "alice", OrderStatus::Pending))
            .collect();

        let first = OrderQuery::default().apply(orders.clone());
        assert_eq!(first.orders.len(), 15);
        assert_eq!(first.total, 32);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.orders[0].id, OrderId(32));

        let last = OrderQuery {
            page: 3,
            ..OrderQuery::default()
        }
        .apply(orders.clone());
        assert_eq!(last.orders.len(), 2);
        assert_eq!(last.orders[1].id, OrderId(1));

        let beyond = OrderQuery {
            page: 9,
            ..OrderQuery::default()
        }
        .apply(orders.clone());
        assert!(beyond.orders.is_empty());

        let zero = OrderQuery {
            page: 0,
            per_page: 0,
            ..OrderQuery::default()
        }
        .apply(orders);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.orders.len(), 1);
    }
}
