use crate::backend::wire::{
    CancelBody, CreateOrderBody, ErrorBody, StatusBody, ROLE_HEADER, USER_HEADER,
};
use crate::backend::{BackendError, OrderBackend, OrderPage, OrderQuery, TransitionRequest};
use crate::model::{Identity, Order, OrderDraft, OrderId, UserId};
use crate::order_actor::InvalidTransition;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

/// [`OrderBackend`] over the storefront's REST routes.
///
/// Requests carry the configured identity. Calls that name a customer
/// (`create_order`, `cancel_order`) send that customer as the user instead.
#[derive(Debug, Clone)]
pub struct HttpOrderBackend {
    client: reqwest::Client,
    base: Url,
    identity: Identity,
}

impl HttpOrderBackend {
    pub fn new(base: Url, identity: Identity) -> Self {
        Self::with_client(reqwest::Client::new(), base, identity)
    }

    pub fn with_client(client: reqwest::Client, mut base: Url, identity: Identity) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client,
            base,
            identity,
        }
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Rejected(format!("bad url {path:?}: {e}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        user: &UserId,
    ) -> Result<T, BackendError> {
        let response = request
            .header(USER_HEADER, user.as_str())
            .header(ROLE_HEADER, self.identity.role.as_str())
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let status = response.status();
        debug!(%status, "Response received");
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| BackendError::Unavailable(format!("malformed response: {e}")));
        }

        let body = response.json::<ErrorBody>().await.ok();
        let err = error_from_response(status, body);
        warn!(%status, error = %err, "Request failed");
        Err(err)
    }
}

fn error_from_response(status: StatusCode, body: Option<ErrorBody>) -> BackendError {
    let (message, states) = match body {
        Some(body) => {
            let states = body.current.zip(body.attempted);
            (body.message, states)
        }
        None => (status.to_string(), None),
    };

    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::CONFLICT => match states {
            Some((current, attempted)) => InvalidTransition { current, attempted }.into(),
            None => BackendError::Rejected(message),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            BackendError::Rejected(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Forbidden(message),
        _ => BackendError::Unavailable(message),
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    #[instrument(skip(self, draft), fields(customer = %draft.customer_id))]
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        let body = CreateOrderBody {
            restaurant_id: draft.restaurant_id,
            lines: draft.lines,
            delivery_address: draft.delivery_address.to_string(),
            payment_method: draft.payment_method,
            notes: draft.notes,
            delivery_fee: Some(draft.pricing.delivery_fee),
            service_fee: Some(draft.pricing.service_fee),
        };
        let request = self.client.post(self.url("orders")?).json(&body);
        self.send(request, &draft.customer_id).await
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, BackendError> {
        let request = self.client.get(self.url(&format!("orders/{id}"))?);
        match self.send(request, &self.identity.user).await {
            Ok(order) => Ok(Some(order)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, BackendError> {
        let mut url = self.url("orders")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("perPage", &query.per_page.to_string());
            if let Some(status) = query.status {
                pairs.append_pair("status", status.as_str());
            }
            if let Some(customer) = &query.customer {
                pairs.append_pair("customer", customer.as_str());
            }
        }
        self.send(self.client.get(url), &self.identity.user).await
    }

    #[instrument(skip(self))]
    async fn transition(
        &self,
        id: OrderId,
        request: TransitionRequest,
    ) -> Result<Order, BackendError> {
        let body = StatusBody {
            status: request.target,
            expected_status: Some(request.expected),
            reason: request.reason,
        };
        let request = self
            .client
            .put(self.url(&format!("orders/{id}/status"))?)
            .json(&body);
        self.send(request, &self.identity.user).await
    }

    #[instrument(skip(self))]
    async fn cancel_order(
        &self,
        id: OrderId,
        customer: UserId,
        reason: Option<String>,
    ) -> Result<Order, BackendError> {
        let request = self
            .client
            .put(self.url(&format!("orders/{id}/cancel"))?)
            .json(&CancelBody { reason });
        self.send(request, &customer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    #[test]
    fn test_conflict_body_becomes_invalid_transition() {
        let body = ErrorBody {
            error: "invalid_transition".into(),
            message: "cannot move order from delivered to cancelled".into(),
            current: Some(OrderStatus::Delivered),
            attempted: Some(OrderStatus::Cancelled),
        };
        assert_eq!(
            error_from_response(StatusCode::CONFLICT, Some(body)),
            BackendError::InvalidTransition(InvalidTransition {
                current: OrderStatus::Delivered,
                attempted: OrderStatus::Cancelled,
            })
        );
        assert!(matches!(
            error_from_response(StatusCode::SERVICE_UNAVAILABLE, None),
            BackendError::Unavailable(_)
        ));
    }

    #[test]
    fn test_base_url_keeps_its_path() {
        let backend = HttpOrderBackend::new(
            Url::parse("http://localhost:8080/api").unwrap(),
            Identity::admin("staff"),
        );
        assert_eq!(
            backend.url("orders/order_3/status").unwrap().as_str(),
            "http://localhost:8080/api/orders/order_3/status"
        );
    }
}
