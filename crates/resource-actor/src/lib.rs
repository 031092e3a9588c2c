//! # Resource Actor
//!
//! A small, type-safe actor runtime for managing a collection of stateful
//! resources from a single Tokio task.
//!
//! Every resource type implements [`ActorEntity`]. A [`ResourceActor`] owns the
//! in-memory store for that type and processes requests one at a time, so an
//! entity is never observed half-way through a change and no locks are needed
//! around the store. Callers talk to the actor through a cloneable
//! [`ResourceClient`].
//!
//! ## Operations
//!
//! The request set is deliberately narrow:
//!
//! - **Create**: allocate the next id and build the entity from a DTO.
//! - **Get**: fetch a clone of one entity.
//! - **List**: fetch clones of every entity.
//! - **Action**: run an entity-specific command.
//!
//! There is no generic update or delete. Resources managed here are
//! append-only and change only through their own actions.
//!
//! ## Atomic actions
//!
//! An action runs against a working copy of the entity. The copy replaces the
//! stored entity only if [`ActorEntity::handle_action`] returns `Ok`; a failed
//! action leaves the stored entity exactly as it was, however often it is
//! retried.
//!
//! ```rust
//! use resource_actor::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Ticket { id: u32, punched: bool }
//! #[derive(Debug)] struct TicketCreate;
//! #[derive(Debug)] enum TicketAction { Punch }
//! #[derive(Debug, thiserror::Error)] #[error("already punched")] struct TicketError;
//!
//! #[async_trait]
//! impl ActorEntity for Ticket {
//!     type Id = u32;
//!     type Create = TicketCreate;
//!     type Action = TicketAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = TicketError;
//!
//!     fn from_create_params(id: u32, _: TicketCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, punched: false })
//!     }
//!
//!     async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Self::Error> {
//!         if self.punched { return Err(TicketError); }
//!         self.punched = true;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Ticket>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(TicketCreate).await.unwrap();
//!     client.perform_action(id, TicketAction::Punch).await.unwrap();
//!     assert!(client.perform_action(id, TicketAction::Punch).await.is_err());
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a [`MockClient`](mock::MockClient) that answers
//! requests from queued expectations, so client wrappers can be tested without
//! a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
