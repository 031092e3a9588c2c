//! Order route handlers.

use crate::api::{ApiError, AppState};
use crate::backend::wire::{CancelBody, CreateOrderBody, ListParams, StatusBody};
use crate::backend::{OrderPage, OrderQuery};
use crate::model::{CartAggregate, Identity, Order, OrderId};
use crate::pricing::FeeSchedule;
use crate::service::CheckoutDetails;
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

fn parse_id(raw: &str) -> Result<OrderId, ApiError> {
    raw.parse()
        .map_err(|e: crate::model::ParseOrderIdError| ApiError::Validation(e.to_string()))
}

fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "{} may not change order status",
            identity.user
        )))
    }
}

/// `POST /orders`: the server reprices the submitted lines.
#[instrument(skip(state, body), fields(user = %identity.user))]
pub async fn create_order(
    State(state): State<AppState>,
    identity: Identity,
    body: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    // An empty line list is reported by checkout as an empty cart.
    let cart = if body.lines.is_empty() {
        CartAggregate::new()
    } else {
        CartAggregate::from_parts(Some(body.restaurant_id), body.lines)
            .map_err(|e| ApiError::Validation(e.to_string()))?
    };
    let fees = FeeSchedule::new(
        body.delivery_fee
            .unwrap_or_else(|| state.default_fees.delivery_fee()),
        body.service_fee
            .unwrap_or_else(|| state.default_fees.service_fee()),
    )
    .map_err(|e| ApiError::Validation(e.to_string()))?;
    let details = CheckoutDetails {
        delivery_address: body.delivery_address,
        payment_method: body.payment_method,
        notes: body.notes,
    };

    let order = state
        .orders
        .checkout(&identity.user, &cart, &fees, details)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders`: customers see their own orders, admins see everything.
#[instrument(skip(state, params), fields(user = %identity.user))]
pub async fn list_orders(
    State(state): State<AppState>,
    identity: Identity,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<OrderPage>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let customer = if identity.is_admin() {
        params.customer
    } else {
        Some(identity.user)
    };
    let query = OrderQuery {
        customer,
        status: params.status,
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(0),
    };
    Ok(Json(state.orders.orders(query).await?))
}

/// `GET /orders/{id}`. Other customers' orders read as not found.
#[instrument(skip(state), fields(user = %identity.user))]
pub async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    match state.orders.order(id).await? {
        Some(order) if identity.is_admin() || order.customer_id == identity.user => {
            Ok(Json(order))
        }
        _ => Err(ApiError::NotFound(id.to_string())),
    }
}

/// `PUT /orders/{id}/status` (admin).
#[instrument(skip(state, body), fields(user = %identity.user))]
pub async fn update_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    require_admin(&identity)?;
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let order = state
        .orders
        .update_status(id, body.status, body.expected_status, body.reason)
        .await?;
    info!(order_id = %order.id, status = %order.status, "Status updated");
    Ok(Json(order))
}

/// `PUT /orders/{id}/cancel`. The body is optional.
#[instrument(skip(state, body), fields(user = %identity.user))]
pub async fn cancel_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let body: CancelBody = if body.iter().all(u8::is_ascii_whitespace) {
        CancelBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::Validation(e.to_string()))?
    };

    let order = state.orders.cancel(id, &identity.user, body.reason).await?;
    info!(order_id = %order.id, "Order cancelled by customer");
    Ok(Json(order))
}
