//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity-level failures are
//! carried boxed inside [`FrameworkError::EntityError`] so client wrappers can
//! downcast them back to the entity's own error type.

/// Errors that can occur within the actor runtime.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
