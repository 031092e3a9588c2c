//! [`ActorEntity`] implementation for [`Order`].

use crate::model::{Order, OrderDraft, OrderId, OrderStatus};
use crate::order_actor::{lifecycle, InvalidTransition, OrderAction, OrderError};
use async_trait::async_trait;
use chrono::Utc;
use resource_actor::ActorEntity;
use tracing::{info, warn};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderDraft;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, draft: OrderDraft) -> Result<Self, OrderError> {
        if draft.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        Ok(Order::from_draft(id, draft, Utc::now()))
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), OrderError> {
        info!(order_id = %self.id, order_number = %self.order_number, total = %self.total, "Order placed");
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<Order, OrderError> {
        let (target, reason) = match action {
            OrderAction::Transition {
                target,
                expected,
                reason,
            } => {
                if expected != self.status {
                    warn!(order_id = %self.id, current = %self.status, %expected, "Stale transition");
                    return Err(InvalidTransition {
                        current: self.status,
                        attempted: target,
                    }
                    .into());
                }
                (target, reason)
            }
            OrderAction::Cancel { customer, reason } => {
                if customer != self.customer_id {
                    warn!(order_id = %self.id, %customer, "Cancel by non-owner");
                    return Err(OrderError::NotFound(self.id.to_string()));
                }
                (OrderStatus::Cancelled, reason)
            }
        };

        let from = self.status;
        *self = lifecycle::transition(self, target, reason, Utc::now())?;
        info!(order_id = %self.id, %from, to = %self.status, "Order status changed");
        Ok(self.clone())
    }
}
