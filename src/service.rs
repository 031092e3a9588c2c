//! # Order Service
//!
//! The checkout boundary: turns a cart snapshot into a placed order, and
//! fronts the [`OrderBackend`] for tracking, fulfillment and cancellation.
//!
//! Checkout never touches the cart. Clearing it after a successful checkout is
//! the caller's job.

use crate::backend::{BackendError, OrderBackend, OrderPage, OrderQuery, TransitionRequest};
use crate::model::{CartAggregate, DeliveryAddress, Order, OrderDraft, OrderId, OrderStatus, UserId};
use crate::pricing::{FeeSchedule, PriceCalculator, PricingError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error("a delivery address is required")]
    MissingAddress,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("order could not be placed: {0}")]
    Backend(#[source] BackendError),
}

/// What the customer entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub delivery_address: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl CheckoutDetails {
    pub fn new(delivery_address: impl Into<String>, payment_method: impl Into<String>) -> Self {
        Self {
            delivery_address: delivery_address.into(),
            payment_method: payment_method.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Clone)]
pub struct OrderService {
    backend: Arc<dyn OrderBackend>,
    page_size: u32,
}

impl OrderService {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self {
            backend,
            page_size: crate::backend::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Places an order for `cart` in `Pending`.
    ///
    /// Validation happens before anything is sent: an empty cart or a blank
    /// address fails without reaching the backend.
    #[instrument(skip(self, cart, fees, details), fields(lines = cart.lines().len()))]
    pub async fn checkout(
        &self,
        customer: &UserId,
        cart: &CartAggregate,
        fees: &FeeSchedule,
        details: CheckoutDetails,
    ) -> Result<Order, CheckoutError> {
        let restaurant_id = match cart.restaurant_id() {
            Some(id) if !cart.is_empty() => id.clone(),
            _ => {
                warn!("Checkout with empty cart");
                return Err(CheckoutError::EmptyCart);
            }
        };
        let Some(delivery_address) = DeliveryAddress::parse(&details.delivery_address) else {
            warn!("Checkout without delivery address");
            return Err(CheckoutError::MissingAddress);
        };

        let draft = OrderDraft {
            customer_id: customer.clone(),
            restaurant_id,
            lines: cart.lines().to_vec(),
            pricing: PriceCalculator::compute(cart, fees)?,
            delivery_address,
            payment_method: details.payment_method.trim().to_string(),
            notes: details
                .notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty()),
        };

        let order = self
            .backend
            .create_order(draft)
            .await
            .map_err(CheckoutError::Backend)?;
        info!(order_id = %order.id, order_number = %order.order_number, total = %order.total, "Checkout complete");
        Ok(order)
    }

    /// Lists orders. A `per_page` of 0 takes the configured page size.
    #[instrument(skip(self))]
    pub async fn orders(&self, mut query: OrderQuery) -> Result<OrderPage, BackendError> {
        if query.per_page == 0 {
            query.per_page = self.page_size;
        }
        self.backend.list_orders(query).await
    }

    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>, BackendError> {
        self.backend.get_order(id).await
    }

    /// Admin status change from the status `order` was read in.
    #[instrument(skip(self, order), fields(order_id = %order.id, current = %order.status))]
    pub async fn advance(&self, order: &Order, target: OrderStatus) -> Result<Order, BackendError> {
        self.backend
            .transition(order.id, TransitionRequest::from_order(order, target))
            .await
    }

    /// Admin status change by id.
    ///
    /// Without `expected`, the order's current status is read first and the
    /// change is made conditional on it. Either way, a concurrent change that
    /// lands in between makes this one fail with `InvalidTransition`.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        target: OrderStatus,
        expected: Option<OrderStatus>,
        reason: Option<String>,
    ) -> Result<Order, BackendError> {
        let expected = match expected {
            Some(expected) => expected,
            None => {
                self.backend
                    .get_order(id)
                    .await?
                    .ok_or_else(|| BackendError::NotFound(id.to_string()))?
                    .status
            }
        };
        let mut request = TransitionRequest::new(expected, target);
        request.reason = reason;
        self.backend.transition(id, request).await
    }

    /// Admin status change carrying a full request, e.g. a cancellation reason.
    #[instrument(skip(self))]
    pub async fn apply(&self, id: OrderId, request: TransitionRequest) -> Result<Order, BackendError> {
        self.backend.transition(id, request).await
    }

    /// Customer cancellation of their own order.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        id: OrderId,
        customer: &UserId,
        reason: Option<String>,
    ) -> Result<Order, BackendError> {
        self.backend
            .cancel_order(id, customer.clone(), reason)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItem;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Refuses every order and counts the attempts.
    #[derive(Default)]
    struct DownBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OrderBackend for DownBackend {
        async fn create_order(&self, _draft: OrderDraft) -> Result<Order, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::Unavailable("connection refused".into()))
        }
        async fn get_order(&self, _id: OrderId) -> Result<Option<Order>, BackendError> {
            Ok(None)
        }
        async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, BackendError> {
            Ok(query.apply(Vec::new()))
        }
        async fn transition(
            &self,
            id: OrderId,
            _request: TransitionRequest,
        ) -> Result<Order, BackendError> {
            Err(BackendError::NotFound(id.to_string()))
        }
        async fn cancel_order(
            &self,
            id: OrderId,
            _customer: UserId,
            _reason: Option<String>,
        ) -> Result<Order, BackendError> {
            Err(BackendError::NotFound(id.to_string()))
        }
    }

    fn one_item_cart() -> CartAggregate {
        let mut cart = CartAggregate::new();
        cart.add(&MenuItem::new("m1", "Soup", Decimal::new(650, 2)), &"r1".into())
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_validation_happens_before_backend() {
        let backend = Arc::new(DownBackend::default());
        let service = OrderService::new(backend.clone());
        let fees = FeeSchedule::standard();

        let empty = service
            .checkout(
                &"u1".into(),
                &CartAggregate::new(),
                &fees,
                CheckoutDetails::new("1 Main St", "card"),
            )
            .await;
        assert!(matches!(empty, Err(CheckoutError::EmptyCart)));

        let blank = service
            .checkout(
                &"u1".into(),
                &one_item_cart(),
                &fees,
                CheckoutDetails::new("   ", "card"),
            )
            .await;
        assert!(matches!(blank, Err(CheckoutError::MissingAddress)));

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_wrapped() {
        let backend = Arc::new(DownBackend::default());
        let service = OrderService::new(backend.clone());
        let cart = one_item_cart();

        let err = service
            .checkout(
                &"u1".into(),
                &cart,
                &FeeSchedule::standard(),
                CheckoutDetails::new("1 Main St", "card"),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Backend(BackendError::Unavailable(_))
        ));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(cart, one_item_cart());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_uses_configured_default() {
        let service = OrderService::new(Arc::new(DownBackend::default())).with_page_size(25);
        let page = service
            .orders(OrderQuery {
                per_page: 0,
                ..OrderQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.per_page, 25);
    }
}
