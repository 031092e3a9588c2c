use crate::model::{OrderStatus, UserId};

/// Custom actions for Order entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Fulfillment move. Fails when `expected` differs from the order's
    /// status at the time the actor handles the request.
    Transition {
        target: OrderStatus,
        expected: OrderStatus,
        reason: Option<String>,
    },
    /// Customer cancellation of their own order.
    Cancel {
        customer: UserId,
        reason: Option<String>,
    },
}
