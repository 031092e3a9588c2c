//! HTTP error mapping for the order routes.

use crate::backend::wire::ErrorBody;
use crate::backend::BackendError;
use crate::order_actor::InvalidTransition;
use crate::service::CheckoutError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or semantically invalid request.
    #[error("{0}")]
    Validation(String),

    #[error("missing x-user-id header")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("order not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(InvalidTransition),

    #[error("order backend unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound(id) => Self::NotFound(id),
            BackendError::InvalidTransition(invalid) => Self::InvalidTransition(invalid),
            BackendError::Rejected(msg) => Self::Validation(msg),
            BackendError::Forbidden(msg) => Self::Forbidden(msg),
            BackendError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::Backend(inner) => inner.into(),
            validation => Self::Validation(validation.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Order request failed");
        } else {
            tracing::debug!(%status, error = %self, "Order request rejected");
        }

        let (current, attempted) = match &self {
            Self::InvalidTransition(invalid) => (Some(invalid.current), Some(invalid.attempted)),
            _ => (None, None),
        };
        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            current,
            attempted,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("order_1".into()), StatusCode::NOT_FOUND),
            (
                ApiError::InvalidTransition(InvalidTransition {
                    current: OrderStatus::Pending,
                    attempted: OrderStatus::Delivered,
                }),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Unavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_checkout_errors_map_to_validation_or_backend() {
        assert!(matches!(
            ApiError::from(CheckoutError::EmptyCart),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(CheckoutError::Pricing(crate::pricing::PricingError::Overflow)),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(CheckoutError::Backend(BackendError::Unavailable("x".into()))),
            ApiError::Unavailable(_)
        ));
    }
}
