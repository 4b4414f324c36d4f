use thiserror::Error;

use catalog_core::{DomainError, ProductId};

use crate::catalog::store::StoreError;

/// Failure of a catalog read or write.
///
/// `Validation` and `NotFound` leave the store untouched and publish nothing.
/// `StoreUnavailable` is surfaced as-is; retrying is the caller's decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => CatalogError::StoreUnavailable(msg),
        }
    }
}

impl From<DomainError> for CatalogError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => CatalogError::Validation(msg),
            e @ DomainError::InvalidId { .. } => CatalogError::Validation(e.to_string()),
            // Product rules never report NotFound; lookups go through the store.
            DomainError::NotFound => CatalogError::Validation("referenced record does not exist".to_string()),
        }
    }
}
