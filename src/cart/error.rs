//! Error types for the cart.

use crate::model::MenuItemId;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    /// The item cannot go into a cart as given.
    #[error("invalid item {item_id}: {reason}")]
    InvalidItem { item_id: MenuItemId, reason: String },

    /// The line would hold more units than the cart allows.
    #[error("item {item_id} is limited to {limit} per order")]
    QuantityLimit { item_id: MenuItemId, limit: u32 },

    /// `resolve_conflict` was called with no conflict waiting.
    #[error("no restaurant conflict is awaiting confirmation")]
    NoPendingConflict,

    #[error("cart snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    /// Persistence failed; the in-memory cart was left as it was.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
