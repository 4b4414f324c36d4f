//! Shopping carts domain module.
//!
//! Carts reference catalog products by id only; checking that a product exists
//! is the service layer's job. Cart changes never touch the catalog.

pub mod cart;

pub use cart::{Cart, CartLine};
