//! Products domain module.
//!
//! Business rules for catalog records, implemented as deterministic domain logic
//! (no IO, no HTTP, no storage). The store assigns identifiers and timestamps;
//! this crate decides what a valid product looks like.

pub mod product;

pub use product::{NewProduct, Product, ProductChanges, ProductDraft, ProductPatch};
