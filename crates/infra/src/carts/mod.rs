//! Cart persistence and operations.
//!
//! Carts are an independent collaborator of the catalog: they read the catalog
//! store to check product ids but never publish catalog changes.

pub mod service;
pub mod store;

pub use service::{CartError, CartService};
pub use store::{CartStore, InMemoryCartStore};
