//! # REST API
//!
//! | Method | Path | Who |
//! |--------|------|-----|
//! | `POST` | `/orders` | customer |
//! | `GET` | `/orders` | customer (own orders), admin (all) |
//! | `GET` | `/orders/{id}` | owner or admin |
//! | `PUT` | `/orders/{id}/status` | admin |
//! | `PUT` | `/orders/{id}/cancel` | owner |
//!
//! The caller is identified by the `x-user-id` and `x-user-role` headers,
//! which the upstream auth layer sets.

pub mod error;
pub mod orders;

pub use error::ApiError;

use crate::backend::wire::{ROLE_HEADER, USER_HEADER};
use crate::model::{Identity, Role, UserId};
use crate::pricing::FeeSchedule;
use crate::service::OrderService;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
    Router,
};

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    /// Fees applied when a create request leaves them out.
    pub default_fees: FeeSchedule,
}

impl AppState {
    pub fn new(orders: OrderService) -> Self {
        Self {
            orders,
            default_fees: FeeSchedule::standard(),
        }
    }

    pub fn with_default_fees(mut self, fees: FeeSchedule) -> Self {
        self.default_fees = fees;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/orders/{id}/cancel", put(orders::cancel_order))
        .with_state(state)
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthenticated)?;
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(Role::Customer);

        Ok(Identity {
            user: UserId::from(user),
            role,
        })
    }
}
