//! Read-only catalog inputs handed to the cart by the menu screens.

use crate::model::{MenuItemId, RestaurantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
}

impl MenuItem {
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// A restaurant as the cart sees it. Fees left unset fall back to the
/// caller's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRef {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
    #[serde(default)]
    pub service_fee: Option<Decimal>,
}

impl RestaurantRef {
    pub fn new(id: impl Into<RestaurantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            delivery_fee: None,
            service_fee: None,
        }
    }

    pub fn with_fees(mut self, delivery_fee: Decimal, service_fee: Decimal) -> Self {
        self.delivery_fee = Some(delivery_fee);
        self.service_fee = Some(service_fee);
        self
    }
}
