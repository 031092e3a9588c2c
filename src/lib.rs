//! # foodcart
//!
//! The core of a food-ordering storefront: a cart locked to one restaurant, a
//! pure price calculator, a checkout boundary that turns the cart into an
//! order, and the order lifecycle driven by restaurant staff and customers.
//!
//! ## Module Tour
//!
//! ### Customer side
//! - [`cart`]: [`CartStore`](cart::CartStore) owns the in-progress cart and
//!   persists it through a [`KeyValueStore`](storage::KeyValueStore) after
//!   every change.
//! - [`pricing`]: [`PriceCalculator`](pricing::PriceCalculator) and
//!   [`FeeSchedule`](pricing::FeeSchedule).
//! - [`service`]: [`OrderService`](service::OrderService), the checkout
//!   boundary.
//!
//! ### Order side
//! Orders are held by a [`ResourceActor`](resource_actor::ResourceActor).
//! It processes one request at a time, which makes every status
//! compare-and-transition atomic.
//! - [`order_actor`]: the `ActorEntity` implementation and the
//!   [`lifecycle`](order_actor::lifecycle) state machine.
//! - [`clients`]: [`OrderClient`](clients::OrderClient), the typed handle to
//!   the actor.
//! - [`backend`]: the [`OrderBackend`](backend::OrderBackend) seam, with an
//!   HTTP implementation for remote storefronts.
//! - [`api`]: the REST routes served by the `foodcart-server` binary.
//!
//! ### Plumbing
//! - [`runtime`]: starting and stopping the actor, tracing setup.
//! - [`config`]: environment-driven settings.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin foodcart-server
//! ```

pub mod api;
pub mod backend;
pub mod cart;
pub mod clients;
pub mod config;
pub mod model;
pub mod order_actor;
pub mod pricing;
pub mod runtime;
pub mod service;
pub mod storage;
