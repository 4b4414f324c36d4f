use serde::{Deserialize, Serialize};

use catalog_carts::CartLine;
use catalog_core::ProductId;
use catalog_infra::catalog::{Page, PageRequest, ProductFilter, SortDirection};
use catalog_products::Product;

/// Raw list query. Values stay strings so that junk falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
}

impl ProductListQuery {
    pub fn page_request(&self, max_limit: u32) -> PageRequest {
        PageRequest::from_raw(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.sort.as_deref(),
            max_limit,
        )
    }

    /// Unrecognized `available` values are ignored.
    pub fn filter(&self) -> ProductFilter {
        let available = match self.available.as_deref().map(str::trim) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        ProductFilter {
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            available,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddToCartRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceCartRequest {
    pub products: Vec<CartLineRequest>,
}

/// Quantities arrive as signed JSON numbers; anything below 1 or beyond `u32`
/// is rejected.
pub fn quantity_from_json(raw: i64) -> Result<u32, String> {
    if raw < 1 {
        return Err("quantity must be at least 1".to_string());
    }
    u32::try_from(raw).map_err(|_| format!("quantity {raw} is too large"))
}

impl ReplaceCartRequest {
    pub fn into_lines(self) -> Result<Vec<CartLine>, String> {
        self.products
            .into_iter()
            .map(|line| {
                Ok(CartLine {
                    product_id: line.product_id,
                    quantity: quantity_from_json(line.quantity)?,
                })
            })
            .collect()
    }
}

/// `/home` view model: one page plus ready-made navigation links.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub products: Vec<Product>,
    pub total_pages: u32,
    pub page: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

fn home_link(page: u32, limit: u32, sort: SortDirection) -> String {
    format!("/home?page={page}&limit={limit}&sort={}", sort.as_str())
}

impl From<Page> for HomeView {
    fn from(page: Page) -> Self {
        let (limit, sort) = (page.limit, page.sort);
        Self {
            prev_link: page.prev_page.map(|p| home_link(p, limit, sort)),
            next_link: page.next_page.map(|p| home_link(p, limit, sort)),
            products: page.products,
            total_pages: page.total_pages,
            page: page.page,
            has_prev_page: page.has_prev_page,
            has_next_page: page.has_next_page,
            prev_page: page.prev_page,
            next_page: page.next_page,
        }
    }
}

/// `/realtimeproducts` view model: the full list plus where to subscribe.
#[derive(Debug, Serialize)]
pub struct RealtimeView {
    pub products: Vec<Product>,
    pub stream: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_bounds() {
        assert_eq!(quantity_from_json(1), Ok(1));
        assert!(quantity_from_json(0).is_err());
        assert!(quantity_from_json(-4).is_err());
        assert!(quantity_from_json(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn list_query_filter_parsing() {
        let query = ProductListQuery {
            category: Some(" kitchen ".to_string()),
            available: Some("maybe".to_string()),
            ..ProductListQuery::default()
        };
        let filter = query.filter();
        assert_eq!(filter.category.as_deref(), Some("kitchen"));
        assert_eq!(filter.available, None);

        let query = ProductListQuery {
            available: Some("false".to_string()),
            ..ProductListQuery::default()
        };
        assert_eq!(query.filter().available, Some(false));
    }

    #[test]
    fn home_links_keep_limit_and_sort() {
        let page = Page {
            products: Vec::new(),
            total_docs: 25,
            limit: 10,
            total_pages: 3,
            page: 2,
            sort: SortDirection::Desc,
            has_prev_page: true,
            has_next_page: true,
            prev_page: Some(1),
            next_page: Some(3),
        };
        let view = HomeView::from(page);
        assert_eq!(view.prev_link.as_deref(), Some("/home?page=1&limit=10&sort=desc"));
        assert_eq!(view.next_link.as_deref(), Some("/home?page=3&limit=10&sort=desc"));
    }
}
