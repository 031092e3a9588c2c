//! # Order Client
//!
//! High-level API for the `Order` actor. It wraps a `ResourceClient<Order>`,
//! recovers the typed [`OrderError`] from boxed entity errors, and serves as
//! the in-process [`OrderBackend`].
use crate::backend::{BackendError, OrderBackend, OrderPage, OrderQuery, TransitionRequest};
use crate::model::{Order, OrderDraft, OrderId, OrderStatus, UserId};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Places an order and returns it as stored.
    #[instrument(skip(self, draft), fields(customer = %draft.customer_id))]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, OrderError> {
        debug!(?draft, "create_order called");
        let id = self.inner.create(draft).await.map_err(Self::map_error)?;
        info!(order_id = %id, "Order created");
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Admin status change, applied only while the order is still `expected`.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        target: OrderStatus,
        expected: OrderStatus,
        reason: Option<String>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let action = OrderAction::Transition {
            target,
            expected,
            reason,
        };
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Cancels `customer`'s own order.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        id: OrderId,
        customer: UserId,
        reason: Option<String>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::Cancel { customer, reason })
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<OrderError> for BackendError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => BackendError::NotFound(id),
            OrderError::InvalidTransition(invalid) => BackendError::InvalidTransition(invalid),
            OrderError::EmptyOrder => BackendError::Rejected(OrderError::EmptyOrder.to_string()),
            OrderError::ActorCommunicationError(msg) => BackendError::Unavailable(msg),
        }
    }
}

#[async_trait]
impl OrderBackend for OrderClient {
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        Ok(OrderClient::create_order(self, draft).await?)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, BackendError> {
        Ok(self.get(id).await?)
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, BackendError> {
        let orders = self.list().await?;
        Ok(query.apply(orders))
    }

    async fn transition(
        &self,
        id: OrderId,
        request: TransitionRequest,
    ) -> Result<Order, BackendError> {
        Ok(OrderClient::transition(self, id, request.target, request.expected, request.reason).await?)
    }

    async fn cancel_order(
        &self,
        id: OrderId,
        customer: UserId,
        reason: Option<String>,
    ) -> Result<Order, BackendError> {
        Ok(self.cancel(id, customer, reason).await?)
    }
}
