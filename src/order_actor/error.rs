//! Error types for the Order actor.

use crate::order_actor::InvalidTransition;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found, or belongs to someone else.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order has no lines.
    #[error("Order has no items")]
    EmptyOrder,

    /// The status change is not allowed from the order's current status.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
