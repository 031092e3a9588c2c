//! The restaurant-locked cart aggregate.
//!
//! `CartAggregate` is also the persisted snapshot format:
//!
//! ```json
//! { "restaurantId": "r1", "lines": [{ "itemId": "m1", "name": "Pizza", "unitPrice": "12.50", "quantity": 2 }] }
//! ```

use crate::model::{MenuItem, MenuItemId, RestaurantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Most units of one item a single line may hold.
pub const MAX_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity, or `None` if that leaves `Decimal`'s range.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Adding an item from a second restaurant to a non-empty cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cart holds items from {existing}; {incoming} requires starting over")]
pub struct RestaurantConflict {
    pub existing: RestaurantId,
    pub incoming: RestaurantId,
}

/// Why [`CartAggregate::add`] left the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    #[error(transparent)]
    Conflict(#[from] RestaurantConflict),
    #[error("item {0} is already at the limit of {max}", max = MAX_QUANTITY)]
    QuantityLimit(MenuItemId),
}

/// A snapshot that breaks the cart's structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    #[error("cart has lines but no restaurant")]
    MissingRestaurant,
    #[error("empty cart still names restaurant {0}")]
    DanglingRestaurant(RestaurantId),
    #[error("item {0} appears on more than one line")]
    DuplicateItem(MenuItemId),
    #[error("item {0} has quantity 0")]
    ZeroQuantity(MenuItemId),
    #[error("item {0} has a negative price")]
    NegativePrice(MenuItemId),
    #[error("item {0} exceeds the limit of {max}", max = MAX_QUANTITY)]
    QuantityTooLarge(MenuItemId),
}

/// Ordered cart lines, all from one restaurant.
///
/// `restaurant_id` is set exactly when `lines` is non-empty, item ids are
/// unique and every quantity is between 1 and [`MAX_QUANTITY`]. The mutators
/// below keep those rules; [`CartAggregate::from_parts`] checks them for data
/// from outside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAggregate {
    restaurant_id: Option<RestaurantId>,
    lines: Vec<CartLine>,
}

impl CartAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw parts, rejecting anything the mutators could
    /// never have produced.
    pub fn from_parts(
        restaurant_id: Option<RestaurantId>,
        lines: Vec<CartLine>,
    ) -> Result<Self, CartInvariantError> {
        let cart = Self {
            restaurant_id,
            lines,
        };
        cart.check_invariants()?;
        Ok(cart)
    }

    pub fn check_invariants(&self) -> Result<(), CartInvariantError> {
        match (&self.restaurant_id, self.lines.is_empty()) {
            (None, false) => return Err(CartInvariantError::MissingRestaurant),
            (Some(id), true) => return Err(CartInvariantError::DanglingRestaurant(id.clone())),
            _ => {}
        }
        let mut seen = HashSet::new();
        for line in &self.lines {
            if !seen.insert(&line.item_id) {
                return Err(CartInvariantError::DuplicateItem(line.item_id.clone()));
            }
            if line.quantity == 0 {
                return Err(CartInvariantError::ZeroQuantity(line.item_id.clone()));
            }
            if line.quantity > MAX_QUANTITY {
                return Err(CartInvariantError::QuantityTooLarge(line.item_id.clone()));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(CartInvariantError::NegativePrice(line.item_id.clone()));
            }
        }
        Ok(())
    }

    pub fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.restaurant_id.as_ref()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: &MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item_id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Summed quantity across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Adds one unit of `item`. Fails without touching the cart when the cart
    /// already belongs to a different restaurant or the line is full.
    pub fn add(&mut self, item: &MenuItem, restaurant: &RestaurantId) -> Result<(), AddError> {
        if let Some(existing) = &self.restaurant_id {
            if existing != restaurant {
                return Err(RestaurantConflict {
                    existing: existing.clone(),
                    incoming: restaurant.clone(),
                }
                .into());
            }
        }

        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) if line.quantity >= MAX_QUANTITY => {
                return Err(AddError::QuantityLimit(item.id.clone()));
            }
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity: 1,
            }),
        }
        self.restaurant_id = Some(restaurant.clone());
        Ok(())
    }

    /// Empties the cart and starts it over with one unit of `item`.
    pub fn replace_with(&mut self, item: &MenuItem, restaurant: &RestaurantId) {
        self.clear();
        // An empty cart accepts any restaurant.
        let _ = self.add(item, restaurant);
    }

    /// Removes one unit. Returns `false` for an unknown item.
    pub fn remove_one(&mut self, item_id: &MenuItemId) -> bool {
        let Some(index) = self.position(item_id) else {
            return false;
        };
        let line = &mut self.lines[index];
        line.quantity -= 1;
        if line.quantity == 0 {
            self.remove_line(index);
        }
        true
    }

    /// Sets the quantity of an existing line; `0` removes it. Returns
    /// `Ok(false)` for an unknown item. Quantities above [`MAX_QUANTITY`] are
    /// refused and leave the cart unchanged.
    pub fn set_quantity(
        &mut self,
        item_id: &MenuItemId,
        quantity: u32,
    ) -> Result<bool, CartInvariantError> {
        if quantity > MAX_QUANTITY {
            return Err(CartInvariantError::QuantityTooLarge(item_id.clone()));
        }
        let Some(index) = self.position(item_id) else {
            return Ok(false);
        };
        if quantity == 0 {
            self.remove_line(index);
        } else {
            self.lines[index].quantity = quantity;
        }
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.restaurant_id = None;
    }

    fn position(&self, item_id: &MenuItemId) -> Option<usize> {
        self.lines.iter().position(|line| &line.item_id == item_id)
    }

    fn remove_line(&mut self, index: usize) {
        self.lines.remove(index);
        if self.lines.is_empty() {
            self.restaurant_id = None;
        }
    }
}
