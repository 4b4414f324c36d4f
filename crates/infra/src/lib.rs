//! Infrastructure layer: stores, services and configuration.

pub mod carts;
pub mod catalog;
pub mod config;
