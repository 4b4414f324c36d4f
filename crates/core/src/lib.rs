//! Identifiers and the domain error model shared by every catalog crate.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CartId, ConnectionId, ProductId};
