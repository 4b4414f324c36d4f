use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{CartId, DomainError, DomainResult, ProductId};

/// One product line in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A shopping cart: ordered lines, at most one line per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: CartId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total number of units across all lines.
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
    }

    /// Add `quantity` units of a product, merging into an existing line.
    pub fn add(&mut self, product_id: ProductId, quantity: u32, now: DateTime<Utc>) -> DomainResult<()> {
        ensure_positive(quantity)?;
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| DomainError::validation("quantity overflow"))?;
            }
            None => self.lines.push(CartLine { product_id, quantity }),
        }
        self.updated_at = now;
        Ok(())
    }

    /// Set the quantity of an existing line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32, now: DateTime<Utc>) -> DomainResult<()> {
        ensure_positive(quantity)?;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(DomainError::not_found)?;
        line.quantity = quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Remove a product line.
    pub fn remove(&mut self, product_id: ProductId, now: DateTime<Utc>) -> DomainResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() == before {
            return Err(DomainError::not_found());
        }
        self.updated_at = now;
        Ok(())
    }

    /// Replace every line. Duplicate product ids are merged in first-seen order.
    pub fn replace(&mut self, lines: Vec<CartLine>, now: DateTime<Utc>) -> DomainResult<()> {
        let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in lines {
            ensure_positive(line.quantity)?;
            match merged.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or_else(|| DomainError::validation("quantity overflow"))?;
                }
                None => merged.push(line),
            }
        }
        self.lines = merged;
        self.updated_at = now;
        Ok(())
    }

    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.lines.clear();
        self.updated_at = now;
    }
}

fn ensure_positive(quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cart() -> Cart {
        Cart::new(CartId::new(), Utc::now())
    }

    #[test]
    fn adding_same_product_twice_merges_lines() {
        let mut cart = empty_cart();
        let pid = ProductId::new();
        cart.add(pid, 1, Utc::now()).unwrap();
        cart.add(pid, 2, Utc::now()).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(pid), Some(3));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut cart = empty_cart();
        let err = cart.add(ProductId::new(), 0, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn set_quantity_requires_existing_line() {
        let mut cart = empty_cart();
        let err = cart.set_quantity(ProductId::new(), 5, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn remove_missing_line_is_not_found() {
        let mut cart = empty_cart();
        let pid = ProductId::new();
        cart.add(pid, 1, Utc::now()).unwrap();

        assert_eq!(cart.remove(ProductId::new(), Utc::now()), Err(DomainError::NotFound));
        cart.remove(pid, Utc::now()).unwrap();
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn replace_merges_duplicates_and_keeps_order() {
        let mut cart = empty_cart();
        let a = ProductId::new();
        let b = ProductId::new();
        cart.replace(
            vec![
                CartLine { product_id: a, quantity: 1 },
                CartLine { product_id: b, quantity: 2 },
                CartLine { product_id: a, quantity: 4 },
            ],
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            cart.lines(),
            &[
                CartLine { product_id: a, quantity: 5 },
                CartLine { product_id: b, quantity: 2 },
            ]
        );
    }

    #[test]
    fn failed_replace_leaves_cart_untouched() {
        let mut cart = empty_cart();
        let pid = ProductId::new();
        cart.add(pid, 2, Utc::now()).unwrap();

        let err = cart
            .replace(vec![CartLine { product_id: ProductId::new(), quantity: 0 }], Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(cart.quantity_of(pid), Some(2));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: total units equals the sum of everything added.
            #[test]
            fn total_units_tracks_adds(quantities in proptest::collection::vec(1u32..50, 1..20)) {
                let mut cart = empty_cart();
                let pid = ProductId::new();
                for q in &quantities {
                    cart.add(pid, *q, Utc::now()).unwrap();
                }
                let expected: u64 = quantities.iter().map(|q| u64::from(*q)).sum();
                prop_assert_eq!(cart.total_units(), expected);
                prop_assert_eq!(cart.lines().len(), 1);
            }
        }
    }
}
