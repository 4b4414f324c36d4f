use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_core::ProductId;
use catalog_products::{Product, ProductChanges, ProductDraft};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached (or its lock was poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Price ordering for bulk reads.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc`/`desc`, case-insensitive. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Query filter for bulk reads. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// `true`: stock > 0, `false`: stock == 0.
    pub available: Option<bool>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(available) = self.available {
            if product.is_available() != available {
                return false;
            }
        }
        true
    }
}

/// Authoritative product collection.
///
/// Every call is individually atomic; a returned `Ok` means the write is durable
/// as far as the implementation goes. Writes to one record are serialized.
pub trait CatalogStore: Send + Sync {
    /// Filtered, price-sorted window. Equal prices keep insertion order.
    fn find(
        &self,
        filter: &ProductFilter,
        sort: SortDirection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError>;

    fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Every product in insertion order.
    fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Persist a draft under a fresh id.
    fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// Apply changes under the record's write lock. `None` if the id is unknown.
    fn update_by_id(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, StoreError>;

    /// Remove a record, returning it. `None` if the id is unknown.
    fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn find(
        &self,
        filter: &ProductFilter,
        sort: SortDirection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).find(filter, sort, skip, limit)
    }

    fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        (**self).count(filter)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_all()
    }

    fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        (**self).insert(draft)
    }

    fn update_by_id(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, StoreError> {
        (**self).update_by_id(id, changes)
    }

    fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).delete_by_id(id)
    }
}

#[derive(Debug, Clone)]
struct Record {
    /// Insertion sequence; secondary sort key.
    seq: u64,
    product: Product,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<ProductId, Record>,
    next_seq: u64,
}

/// In-memory catalog store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Inner>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }
}

fn by_price(a: &Record, b: &Record, sort: SortDirection) -> Ordering {
    let price = a.product.price().total_cmp(&b.product.price());
    let price = match sort {
        SortDirection::Asc => price,
        SortDirection::Desc => price.reverse(),
    };
    price.then(a.seq.cmp(&b.seq))
}

impl CatalogStore for InMemoryCatalogStore {
    fn find(
        &self,
        filter: &ProductFilter,
        sort: SortDirection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let inner = self.read()?;
        let mut matching: Vec<&Record> = inner
            .records
            .values()
            .filter(|r| filter.matches(&r.product))
            .collect();
        matching.sort_by(|a, b| by_price(a, b, sort));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|r| r.product.clone())
            .collect())
    }

    fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let inner = self.read()?;
        Ok(inner.records.values().filter(|r| filter.matches(&r.product)).count() as u64)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let inner = self.read()?;
        Ok(inner.records.get(&id).map(|r| r.product.clone()))
    }

    fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.read()?;
        let mut records: Vec<&Record> = inner.records.values().collect();
        records.sort_by_key(|r| r.seq);
        Ok(records.into_iter().map(|r| r.product.clone()).collect())
    }

    fn insert(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut inner = self.write()?;
        let mut id = ProductId::new();
        while inner.records.contains_key(&id) {
            id = ProductId::new();
        }

        let product = Product::from_draft(id, draft, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.insert(
            id,
            Record {
                seq,
                product: product.clone(),
            },
        );
        Ok(product)
    }

    fn update_by_id(&self, id: ProductId, changes: &ProductChanges) -> Result<Option<Product>, StoreError> {
        let mut inner = self.write()?;
        Ok(inner.records.get_mut(&id).map(|record| {
            record.product.apply(changes, Utc::now());
            record.product.clone()
        }))
    }

    fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut inner = self.write()?;
        Ok(inner.records.remove(&id).map(|r| r.product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_products::{NewProduct, ProductPatch};

    fn draft(title: &str, price: f64, stock: i64, category: Option<&str>) -> ProductDraft {
        NewProduct {
            title: Some(title.to_string()),
            price: Some(price),
            stock: Some(stock),
            category: category.map(str::to_string),
            ..NewProduct::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn insert_assigns_unique_ids() {
        let store = InMemoryCatalogStore::new();
        let a = store.insert(draft("a", 1.0, 1, None)).unwrap();
        let b = store.insert(draft("b", 1.0, 1, None)).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(store.get(a.id()).unwrap(), Some(a));
    }

    #[test]
    fn find_sorts_by_price_with_insertion_tie_break() {
        let store = InMemoryCatalogStore::new();
        let first = store.insert(draft("first", 5.0, 1, None)).unwrap();
        let cheap = store.insert(draft("cheap", 1.0, 1, None)).unwrap();
        let second = store.insert(draft("second", 5.0, 1, None)).unwrap();

        let asc = store.find(&ProductFilter::default(), SortDirection::Asc, 0, 10).unwrap();
        let ids: Vec<_> = asc.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![cheap.id(), first.id(), second.id()]);

        let desc = store.find(&ProductFilter::default(), SortDirection::Desc, 0, 10).unwrap();
        let ids: Vec<_> = desc.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id(), cheap.id()]);
    }

    #[test]
    fn find_applies_skip_and_limit() {
        let store = InMemoryCatalogStore::new();
        for i in 0..5 {
            store.insert(draft("p", f64::from(i), 1, None)).unwrap();
        }
        let window = store.find(&ProductFilter::default(), SortDirection::Asc, 1, 2).unwrap();
        let prices: Vec<_> = window.iter().map(|p| p.price()).collect();
        assert_eq!(prices, vec![1.0, 2.0]);

        assert!(store.find(&ProductFilter::default(), SortDirection::Asc, 10, 2).unwrap().is_empty());
    }

    #[test]
    fn filter_by_category_and_availability() {
        let store = InMemoryCatalogStore::new();
        store.insert(draft("a", 1.0, 0, Some("tools"))).unwrap();
        store.insert(draft("b", 2.0, 3, Some("tools"))).unwrap();
        store.insert(draft("c", 3.0, 3, Some("garden"))).unwrap();

        let tools = ProductFilter {
            category: Some("tools".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(store.count(&tools).unwrap(), 2);

        let tools_in_stock = ProductFilter {
            available: Some(true),
            ..tools
        };
        let found = store.find(&tools_in_stock, SortDirection::Asc, 0, 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "b");

        let sold_out = ProductFilter {
            available: Some(false),
            ..ProductFilter::default()
        };
        assert_eq!(store.count(&sold_out).unwrap(), 1);
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let store = InMemoryCatalogStore::new();
        let changes = ProductPatch::default().validate().unwrap();
        assert_eq!(store.update_by_id(ProductId::new(), &changes).unwrap(), None);
        assert_eq!(store.delete_by_id(ProductId::new()).unwrap(), None);
    }

    #[test]
    fn update_keeps_sort_position_for_ties() {
        let store = InMemoryCatalogStore::new();
        let a = store.insert(draft("a", 2.0, 1, None)).unwrap();
        let b = store.insert(draft("b", 1.0, 1, None)).unwrap();

        let changes = ProductPatch {
            price: Some(2.0),
            ..ProductPatch::default()
        }
        .validate()
        .unwrap();
        store.update_by_id(b.id(), &changes).unwrap();

        let ids: Vec<_> = store
            .find(&ProductFilter::default(), SortDirection::Asc, 0, 10)
            .unwrap()
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn list_all_is_insertion_ordered() {
        let store = InMemoryCatalogStore::new();
        let a = store.insert(draft("a", 9.0, 1, None)).unwrap();
        let b = store.insert(draft("b", 1.0, 1, None)).unwrap();
        let all: Vec<_> = store.list_all().unwrap().iter().map(|p| p.id()).collect();
        assert_eq!(all, vec![a.id(), b.id()]);
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse(" desc "), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("price"), None);
    }
}
