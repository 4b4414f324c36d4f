//! Catalog write path.
//!
//! ```text
//! request
//!   ↓
//! 1. Validate input (pure, `catalog-products`)
//!   ↓
//! 2. Commit to the store (atomic per record)
//!   ↓
//! 3. Hand one ChangeEvent to the notifier (non-blocking)
//!   ↓
//! return committed product
//! ```
//!
//! A failure at step 1 or 2 returns before step 3: no event is ever published for
//! a write that did not commit.
//!
//! Steps 2 and 3 run under one write lock, so subscribers see changes in commit
//! order. Publishing only enqueues, so the lock is held briefly.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use catalog_core::ProductId;
use catalog_events::{ChangeEvent, ChangeNotifier};
use catalog_products::{NewProduct, Product, ProductPatch};

use crate::catalog::error::CatalogError;
use crate::catalog::store::{CatalogStore, StoreError};

/// Validated create/update/delete against a [`CatalogStore`], publishing each
/// committed change to a [`ChangeNotifier`].
///
/// - `S`: store implementation
/// - `N`: notifier implementation
#[derive(Debug)]
pub struct CatalogService<S, N> {
    store: S,
    notifier: N,
    write_lock: Mutex<()>,
}

impl<S, N> CatalogService<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// The guarded value is `()`, so a poisoned lock is still usable.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

fn unavailable(op: &'static str) -> impl FnOnce(StoreError) -> CatalogError {
    move |e| {
        tracing::warn!(op, "catalog store failure: {e}");
        CatalogError::from(e)
    }
}

impl<S, N> CatalogService<S, N>
where
    S: CatalogStore,
    N: ChangeNotifier,
{
    /// Validate and persist a new product, then publish `created`.
    pub fn create(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let draft = input.validate()?;
        let _writes = self.lock_writes();
        let product = self.store.insert(draft).map_err(unavailable("create"))?;

        tracing::info!(product_id = %product.id(), price = product.price(), "product created");
        self.notifier.publish(ChangeEvent::created(product.clone(), Utc::now()));
        Ok(product)
    }

    /// Apply a validated partial update, then publish `updated`.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let changes = patch.validate()?;
        let _writes = self.lock_writes();
        let product = self
            .store
            .update_by_id(id, &changes)
            .map_err(unavailable("update"))?
            .ok_or(CatalogError::NotFound(id))?;

        tracing::info!(product_id = %id, "product updated");
        self.notifier.publish(ChangeEvent::updated(product.clone(), Utc::now()));
        Ok(product)
    }

    /// Remove a product, then publish `deleted`. Returns the removed record.
    pub fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        let _writes = self.lock_writes();
        let product = self
            .store
            .delete_by_id(id)
            .map_err(unavailable("delete"))?
            .ok_or(CatalogError::NotFound(id))?;

        tracing::info!(product_id = %id, "product deleted");
        self.notifier.publish(ChangeEvent::deleted(id, Utc::now()));
        Ok(product)
    }

    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .get(id)
            .map_err(unavailable("get"))?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Every product in insertion order (real-time view bootstrap).
    pub fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.store.list_all().map_err(unavailable("list_all"))
    }
}
