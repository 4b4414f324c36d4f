use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use catalog_carts::Cart;
use catalog_core::CartId;

use crate::carts::service::CartError;
use crate::catalog::StoreError;

/// Cart collection. Modifications are atomic per cart.
pub trait CartStore: Send + Sync {
    fn insert(&self, cart: Cart) -> Result<(), StoreError>;

    fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError>;

    /// Run `f` against a copy of the cart and keep the result only if `f` succeeds.
    fn modify<F>(&self, id: CartId, f: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>;
}

impl<S> CartStore for Arc<S>
where
    S: CartStore,
{
    fn insert(&self, cart: Cart) -> Result<(), StoreError> {
        (**self).insert(cart)
    }

    fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError> {
        (**self).get(id)
    }

    fn modify<F>(&self, id: CartId, f: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        (**self).modify(id, f)
    }
}

/// In-memory cart store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    inner: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("cart lock poisoned".to_string())
}

impl CartStore for InMemoryCartStore {
    fn insert(&self, cart: Cart) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(cart.id(), cart);
        Ok(())
    }

    fn get(&self, id: CartId) -> Result<Option<Cart>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn modify<F>(&self, id: CartId, f: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut map = self.inner.write().map_err(|_| CartError::from(poisoned()))?;
        let current = map.get(&id).ok_or(CartError::CartNotFound(id))?;

        let mut next = current.clone();
        f(&mut next)?;
        map.insert(id, next.clone());
        Ok(next)
    }
}
