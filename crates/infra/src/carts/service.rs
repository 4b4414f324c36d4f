use chrono::Utc;
use thiserror::Error;

use catalog_carts::{Cart, CartLine};
use catalog_core::{CartId, DomainError, ProductId};

use crate::carts::store::CartStore;
use crate::catalog::{CatalogStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cart {0} not found")]
    CartNotFound(CartId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CartError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => CartError::StoreUnavailable(msg),
        }
    }
}

/// Map a cart rule failure about `product_id`.
fn line_error(product_id: ProductId) -> impl FnOnce(DomainError) -> CartError {
    move |e| match e {
        e if e.is_not_found() => CartError::LineNotFound(product_id),
        DomainError::Validation(msg) => CartError::Validation(msg),
        other => CartError::Validation(other.to_string()),
    }
}

/// Cart operations over a [`CartStore`], checking product ids against a
/// [`CatalogStore`].
#[derive(Debug)]
pub struct CartService<C, S> {
    carts: C,
    catalog: S,
}

impl<C, S> CartService<C, S> {
    pub fn new(carts: C, catalog: S) -> Self {
        Self { carts, catalog }
    }
}

impl<C, S> CartService<C, S>
where
    C: CartStore,
    S: CatalogStore,
{
    pub fn create(&self) -> Result<Cart, CartError> {
        let cart = Cart::new(CartId::new(), Utc::now());
        self.carts.insert(cart.clone())?;
        tracing::info!(cart_id = %cart.id(), "cart created");
        Ok(cart)
    }

    pub fn get(&self, id: CartId) -> Result<Cart, CartError> {
        self.carts.get(id)?.ok_or(CartError::CartNotFound(id))
    }

    /// Add units of a product, merging into an existing line.
    pub fn add_product(&self, id: CartId, product_id: ProductId, quantity: u32) -> Result<Cart, CartError> {
        self.ensure_product(product_id)?;
        let cart = self.carts.modify(id, |cart| {
            cart.add(product_id, quantity, Utc::now())
                .map_err(line_error(product_id))
        })?;
        tracing::debug!(cart_id = %id, product_id = %product_id, quantity, "cart line added");
        Ok(cart)
    }

    pub fn set_quantity(&self, id: CartId, product_id: ProductId, quantity: u32) -> Result<Cart, CartError> {
        self.carts.modify(id, |cart| {
            cart.set_quantity(product_id, quantity, Utc::now())
                .map_err(line_error(product_id))
        })
    }

    pub fn remove_product(&self, id: CartId, product_id: ProductId) -> Result<Cart, CartError> {
        self.carts.modify(id, |cart| {
            cart.remove(product_id, Utc::now())
                .map_err(line_error(product_id))
        })
    }

    /// Replace every line; each product must exist in the catalog.
    pub fn replace_lines(&self, id: CartId, lines: Vec<CartLine>) -> Result<Cart, CartError> {
        for line in &lines {
            self.ensure_product(line.product_id)?;
        }
        self.carts.modify(id, |cart| {
            cart.replace(lines, Utc::now()).map_err(|e| match e {
                DomainError::Validation(msg) => CartError::Validation(msg),
                other => CartError::Validation(other.to_string()),
            })
        })
    }

    pub fn clear(&self, id: CartId) -> Result<Cart, CartError> {
        self.carts.modify(id, |cart| {
            cart.clear(Utc::now());
            Ok(())
        })
    }

    fn ensure_product(&self, product_id: ProductId) -> Result<(), CartError> {
        match self.catalog.get(product_id)? {
            Some(_) => Ok(()),
            None => Err(CartError::ProductNotFound(product_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use catalog_products::NewProduct;

    use crate::carts::store::InMemoryCartStore;
    use crate::catalog::InMemoryCatalogStore;

    type Svc = CartService<Arc<InMemoryCartStore>, Arc<InMemoryCatalogStore>>;

    fn setup() -> (Svc, ProductId) {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let draft = NewProduct {
            title: Some("Mug".to_string()),
            price: Some(8.0),
            stock: Some(10),
            ..NewProduct::default()
        }
        .validate()
        .unwrap();
        let product = catalog.insert(draft).unwrap();
        (CartService::new(Arc::new(InMemoryCartStore::new()), catalog), product.id())
    }

    #[test]
    fn create_then_add_product() {
        let (svc, pid) = setup();
        let cart = svc.create().unwrap();

        svc.add_product(cart.id(), pid, 1).unwrap();
        let cart = svc.add_product(cart.id(), pid, 2).unwrap();
        assert_eq!(cart.quantity_of(pid), Some(3));
        assert_eq!(svc.get(cart.id()).unwrap(), cart);
    }

    #[test]
    fn unknown_cart_and_product_are_reported() {
        let (svc, pid) = setup();
        let missing_cart = CartId::new();
        assert_eq!(svc.get(missing_cart), Err(CartError::CartNotFound(missing_cart)));
        assert_eq!(
            svc.add_product(missing_cart, pid, 1),
            Err(CartError::CartNotFound(missing_cart))
        );

        let cart = svc.create().unwrap();
        let missing_product = ProductId::new();
        assert_eq!(
            svc.add_product(cart.id(), missing_product, 1),
            Err(CartError::ProductNotFound(missing_product))
        );
    }

    #[test]
    fn failed_modification_is_not_persisted() {
        let (svc, pid) = setup();
        let cart = svc.create().unwrap();
        svc.add_product(cart.id(), pid, 2).unwrap();

        let err = svc.set_quantity(cart.id(), pid, 0).unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert_eq!(svc.get(cart.id()).unwrap().quantity_of(pid), Some(2));
    }

    #[test]
    fn remove_and_clear() {
        let (svc, pid) = setup();
        let cart = svc.create().unwrap();
        svc.add_product(cart.id(), pid, 1).unwrap();

        let stranger = ProductId::new();
        assert_eq!(
            svc.remove_product(cart.id(), stranger).unwrap_err(),
            CartError::LineNotFound(stranger)
        );

        svc.add_product(cart.id(), pid, 1).unwrap();
        let cart = svc.clear(cart.id()).unwrap();
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn replace_lines_checks_catalog() {
        let (svc, pid) = setup();
        let cart = svc.create().unwrap();

        let cart = svc
            .replace_lines(cart.id(), vec![CartLine { product_id: pid, quantity: 4 }])
            .unwrap();
        assert_eq!(cart.total_units(), 4);

        let ghost = ProductId::new();
        assert_eq!(
            svc.replace_lines(cart.id(), vec![CartLine { product_id: ghost, quantity: 1 }]),
            Err(CartError::ProductNotFound(ghost))
        );
        assert_eq!(svc.get(cart.id()).unwrap().total_units(), 4);
    }
}
