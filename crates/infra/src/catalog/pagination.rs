//! Deterministic windowing over the catalog store.
//!
//! Pages are price-sorted with insertion order as the tie-break, so repeated
//! reads of an unchanged store return identical output. Reads never publish.

use serde::Serialize;

use catalog_products::Product;

use crate::catalog::error::CatalogError;
use crate::catalog::store::{CatalogStore, ProductFilter, SortDirection};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_MAX_LIMIT: u32 = 100;

/// Normalized page request: page and limit are always ≥ 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    /// Zero values fall back to the defaults.
    pub fn new(page: u32, limit: u32, sort: SortDirection) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            sort,
        }
    }

    /// Build from raw query-string values.
    ///
    /// Missing, non-numeric, zero or negative page/limit fall back to 1/10; limit
    /// is capped at `max_limit`. An unknown sort falls back to ascending.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, sort: Option<&str>, max_limit: u32) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .unwrap_or(DEFAULT_LIMIT)
            .min(max_limit.max(1));
        let sort = sort.and_then(SortDirection::parse).unwrap_or_default();
        Self { page, limit, sort }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let value: i64 = raw?.trim().parse().ok()?;
    if value < 1 {
        return None;
    }
    Some(u32::try_from(value).unwrap_or(u32::MAX))
}

/// One window of the catalog plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub products: Vec<Product>,
    pub total_docs: u64,
    pub limit: u32,
    pub total_pages: u32,
    pub page: u32,
    pub sort: SortDirection,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

/// Pagination engine over a [`CatalogStore`].
#[derive(Debug)]
pub struct Paginator<S> {
    store: S,
    max_limit: u32,
}

impl<S> Paginator<S> {
    pub fn new(store: S) -> Self {
        Self::with_max_limit(store, DEFAULT_MAX_LIMIT)
    }

    pub fn with_max_limit(store: S, max_limit: u32) -> Self {
        Self {
            store,
            max_limit: max_limit.max(1),
        }
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

impl<S> Paginator<S>
where
    S: CatalogStore,
{
    /// Read one page. A page past the end is empty but otherwise well-formed.
    pub fn paginate(&self, filter: &ProductFilter, request: PageRequest) -> Result<Page, CatalogError> {
        let request = PageRequest::new(request.page, request.limit.min(self.max_limit), request.sort);
        let limit = u64::from(request.limit);

        let total_docs = self.store.count(filter).map_err(|e| {
            tracing::warn!("catalog count failed: {e}");
            CatalogError::from(e)
        })?;
        let total_pages = u32::try_from(total_docs.div_ceil(limit).max(1)).unwrap_or(u32::MAX);

        let products = if request.page > total_pages {
            Vec::new()
        } else {
            let skip = u64::from(request.page - 1) * limit;
            self.store
                .find(filter, request.sort, skip, limit)
                .map_err(|e| {
                    tracing::warn!("catalog find failed: {e}");
                    CatalogError::from(e)
                })?
        };

        let has_prev_page = request.page > 1;
        let has_next_page = request.page < total_pages;

        Ok(Page {
            products,
            total_docs,
            limit: request.limit,
            total_pages,
            page: request.page,
            sort: request.sort,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| request.page - 1),
            next_page: has_next_page.then(|| request.page + 1),
        })
    }
}
