//! Runtime orchestration: starting and stopping the order actor, and
//! installing the tracing subscriber.

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use tracing::*;
