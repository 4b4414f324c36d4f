//! Catalog read/write paths.
//!
//! - `store`: the authoritative product collection (`CatalogStore`)
//! - `pagination`: windowed, price-sorted bulk reads
//! - `service`: validated create/update/delete with change publication

pub mod error;
pub mod pagination;
pub mod service;
pub mod store;

pub use error::CatalogError;
pub use pagination::{Page, PageRequest, Paginator};
pub use service::CatalogService;
pub use store::{CatalogStore, InMemoryCatalogStore, ProductFilter, SortDirection, StoreError};
