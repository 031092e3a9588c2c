//! Pure data structures shared by the cart, the order actor and the REST
//! surface.

pub mod cart;
pub mod catalog;
pub mod identity;
pub mod ids;
pub mod order;
pub mod status;

pub use cart::*;
pub use catalog::*;
pub use identity::*;
pub use ids::*;
pub use order::*;
pub use status::*;
