//! # Order Lifecycle
//!
//! ```text
//! Pending -> Confirmed -> Preparing -> OnTheWay -> Delivered
//!    \___________\____________\___________\______> Cancelled
//! ```
//!
//! An order moves one step forward at a time or is cancelled from any
//! non-terminal state. `Delivered` and `Cancelled` are terminal.

use crate::model::{Order, OrderStatus, StatusChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot move order from {current} to {attempted}")]
pub struct InvalidTransition {
    pub current: OrderStatus,
    pub attempted: OrderStatus,
}

pub fn can_transition(current: OrderStatus, target: OrderStatus) -> bool {
    match target {
        OrderStatus::Cancelled => !current.is_terminal(),
        _ => current.next() == Some(target),
    }
}

/// Returns `order` moved to `target` with one history entry appended.
///
/// `order` itself is never touched, so a rejected move cannot leave a partial
/// update behind. `reason` is recorded only for cancellations.
pub fn transition(
    order: &Order,
    target: OrderStatus,
    reason: Option<String>,
    at: DateTime<Utc>,
) -> Result<Order, InvalidTransition> {
    if !can_transition(order.status, target) {
        return Err(InvalidTransition {
            current: order.status,
            attempted: target,
        });
    }

    let mut next = order.clone();
    next.status = target;
    next.updated_at = at;
    next.status_history.push(StatusChange {
        status: target,
        at,
        reason: reason.filter(|_| target == OrderStatus::Cancelled),
    });
    Ok(next)
}
