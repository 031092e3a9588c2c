//! # Cart Store
//!
//! The customer's in-progress cart. A [`CartStore`] owns one
//! [`CartAggregate`], persists it through a [`KeyValueStore`] after every
//! mutation, and prices it with the [`PriceCalculator`].
//!
//! Each mutation is computed on a copy, written out, and only then swapped in.
//! A failed write therefore leaves the cart exactly as it was.
//!
//! ## Restaurant conflicts
//! Adding an item from another restaurant does not mutate anything. It
//! returns [`AddOutcome::Conflict`] and parks the item; the caller asks the
//! user and answers with [`CartStore::resolve_conflict`].

pub mod error;

pub use error::CartError;

use crate::model::{
    AddError, CartAggregate, MenuItem, MenuItemId, RestaurantConflict, RestaurantId,
    RestaurantRef, MAX_QUANTITY,
};
use crate::pricing::{FeeSchedule, PriceBreakdown, PriceCalculator, PricingError};
use crate::storage::KeyValueStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Storage key for the persisted cart snapshot.
pub const CART_KEY: &str = "cart";

/// Result of [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(CartAggregate),
    /// Nothing changed; confirm with [`CartStore::resolve_conflict`].
    Conflict(RestaurantConflict),
}

#[derive(Debug, Clone)]
struct PendingItem {
    item: MenuItem,
    restaurant: RestaurantId,
    conflict: RestaurantConflict,
}

pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    cart: CartAggregate,
    pending: Option<PendingItem>,
}

impl CartStore {
    /// An empty cart persisted under [`CART_KEY`]. Nothing is read or written.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_cart(store, CART_KEY, CartAggregate::new())
    }

    fn with_cart(store: Arc<dyn KeyValueStore>, key: &str, cart: CartAggregate) -> Self {
        Self {
            store,
            key: key.to_string(),
            cart,
            pending: None,
        }
    }

    /// Restores the cart saved under `key`.
    ///
    /// A missing key gives an empty cart. A snapshot that does not parse, or
    /// parses into something the cart could never hold, is dropped with a
    /// warning and the cart starts empty. Only a failing read is an error.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn KeyValueStore>, key: &str) -> Result<Self, CartError> {
        let cart = match store.get(key).await? {
            None => CartAggregate::new(),
            Some(raw) => match serde_json::from_str::<CartAggregate>(&raw) {
                Ok(cart) => match cart.check_invariants() {
                    Ok(()) => cart,
                    Err(e) => {
                        warn!(error = %e, "Discarding inconsistent cart snapshot");
                        CartAggregate::new()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart snapshot");
                    CartAggregate::new()
                }
            },
        };
        debug!(lines = cart.lines().len(), "Cart restored");
        Ok(Self::with_cart(store, key, cart))
    }

    /// Adds one unit of `item` from `restaurant`.
    #[instrument(skip(self, item, restaurant), fields(item_id = %item.id, restaurant_id = %restaurant.id))]
    pub async fn add_item(
        &mut self,
        item: &MenuItem,
        restaurant: &RestaurantRef,
    ) -> Result<AddOutcome, CartError> {
        if item.price < Decimal::ZERO {
            warn!(price = %item.price, "Rejected item with negative price");
            return Err(CartError::InvalidItem {
                item_id: item.id.clone(),
                reason: format!("negative price {}", item.price),
            });
        }

        let mut next = self.cart.clone();
        match next.add(item, &restaurant.id) {
            Ok(()) => Ok(AddOutcome::Added(self.commit(next).await?)),
            Err(AddError::QuantityLimit(item_id)) => {
                warn!("Line already at quantity limit");
                Err(CartError::QuantityLimit {
                    item_id,
                    limit: MAX_QUANTITY,
                })
            }
            Err(AddError::Conflict(conflict)) => {
                info!(existing = %conflict.existing, "Restaurant conflict awaiting confirmation");
                self.pending = Some(PendingItem {
                    item: item.clone(),
                    restaurant: restaurant.id.clone(),
                    conflict: conflict.clone(),
                });
                Ok(AddOutcome::Conflict(conflict))
            }
        }
    }

    /// Answers the most recent conflict.
    ///
    /// `keep_new = true` empties the cart and starts it over with the parked
    /// item. `false` drops the parked item and leaves the cart untouched.
    #[instrument(skip(self))]
    pub async fn resolve_conflict(&mut self, keep_new: bool) -> Result<CartAggregate, CartError> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(CartError::NoPendingConflict);
        };

        if !keep_new {
            info!("Conflict declined");
            self.pending = None;
            return Ok(self.snapshot());
        }

        let mut next = CartAggregate::new();
        next.replace_with(&pending.item, &pending.restaurant);
        let snapshot = self.commit(next).await?;
        info!(restaurant_id = ?snapshot.restaurant_id(), "Cart switched restaurant");
        Ok(snapshot)
    }

    /// Removes one unit of `item_id`; unknown ids are a no-op.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, item_id: &MenuItemId) -> Result<CartAggregate, CartError> {
        let mut next = self.cart.clone();
        if !next.remove_one(item_id) {
            debug!("Unknown item; nothing to remove");
            return Ok(self.snapshot());
        }
        self.commit(next).await
    }

    /// Sets the quantity of an existing line; `0` removes it and unknown ids
    /// are a no-op. Anything above [`MAX_QUANTITY`] is refused.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &mut self,
        item_id: &MenuItemId,
        quantity: u32,
    ) -> Result<CartAggregate, CartError> {
        let mut next = self.cart.clone();
        let found = next.set_quantity(item_id, quantity).map_err(|_| {
            warn!("Quantity above limit");
            CartError::QuantityLimit {
                item_id: item_id.clone(),
                limit: MAX_QUANTITY,
            }
        })?;
        if !found {
            debug!("Unknown item; nothing to update");
            return Ok(self.snapshot());
        }
        self.commit(next).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<CartAggregate, CartError> {
        self.commit(CartAggregate::new()).await
    }

    pub fn snapshot(&self) -> CartAggregate {
        self.cart.clone()
    }

    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    pub fn totals(&self, fees: &FeeSchedule) -> Result<PriceBreakdown, PricingError> {
        PriceCalculator::compute(&self.cart, fees)
    }

    /// The conflict currently awaiting an answer, if any.
    pub fn pending_conflict(&self) -> Option<&RestaurantConflict> {
        self.pending.as_ref().map(|pending| &pending.conflict)
    }

    async fn commit(&mut self, next: CartAggregate) -> Result<CartAggregate, CartError> {
        let encoded = serde_json::to_string(&next)?;
        self.store.set(&self.key, encoded).await?;
        debug!(lines = next.lines().len(), "Cart persisted");
        self.cart = next;
        self.pending = None;
        Ok(self.snapshot())
    }
}
