use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ProductId};

/// A catalog record as held by the store.
///
/// Fields are private: a `Product` only comes into existence through
/// [`Product::from_draft`] and only changes through [`Product::apply`], so every
/// instance satisfies the field rules enforced by [`NewProduct::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    description: String,
    code: Option<String>,
    price: f64,
    stock: i64,
    category: Option<String>,
    thumbnails: Vec<String>,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a validated draft under a store-assigned id.
    pub fn from_draft(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            code: draft.code,
            price: draft.price,
            stock: draft.stock,
            category: draft.category,
            thumbnails: draft.thumbnails,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply validated partial changes. Untouched fields keep their values.
    pub fn apply(&mut self, changes: &ProductChanges, now: DateTime<Utc>) {
        let patch = &changes.0;
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(code) = &patch.code {
            self.code = Some(code.clone());
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(thumbnails) = &patch.thumbnails {
            self.thumbnails = thumbnails.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn thumbnails(&self) -> &[String] {
        &self.thumbnails
    }

    pub fn status(&self) -> bool {
        self.status
    }

    /// Whether at least one unit is in stock.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Unvalidated input for creating a product (request body shape).
///
/// Everything is optional so that a missing field is reported as a validation
/// failure rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
    pub status: Option<bool>,
}

impl NewProduct {
    /// Check field rules and produce a draft the store can persist.
    ///
    /// Title and price are required; stock defaults to 0, status to `true`.
    pub fn validate(self) -> DomainResult<ProductDraft> {
        let title = match self.title {
            Some(t) => validate_title(&t)?,
            None => return Err(DomainError::validation("title is required")),
        };
        let price = match self.price {
            Some(p) => validate_price(p)?,
            None => return Err(DomainError::validation("price is required")),
        };
        let stock = validate_stock(self.stock.unwrap_or(0))?;

        Ok(ProductDraft {
            title,
            description: self.description.unwrap_or_default(),
            code: self.code,
            price,
            stock,
            category: self.category,
            thumbnails: self.thumbnails.unwrap_or_default(),
            status: self.status.unwrap_or(true),
        })
    }
}

/// Validated creation input. Only obtainable from [`NewProduct::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    title: String,
    description: String,
    code: Option<String>,
    price: f64,
    stock: i64,
    category: Option<String>,
    thumbnails: Vec<String>,
    status: bool,
}

impl ProductDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Unvalidated partial update (request body shape). `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
    pub status: Option<bool>,
}

impl ProductPatch {
    /// Apply the creation rules to every field the patch touches.
    pub fn validate(self) -> DomainResult<ProductChanges> {
        if let Some(t) = &self.title {
            validate_title(t)?;
        }
        if let Some(p) = self.price {
            validate_price(p)?;
        }
        if let Some(s) = self.stock {
            validate_stock(s)?;
        }
        Ok(ProductChanges(self))
    }
}

/// Validated partial update. Only obtainable from [`ProductPatch::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges(ProductPatch);

impl ProductChanges {
    pub fn patch(&self) -> &ProductPatch {
        &self.0
    }
}

fn validate_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> DomainResult<f64> {
    if !price.is_finite() {
        return Err(DomainError::validation("price must be a finite number"));
    }
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(price)
}

fn validate_stock(stock: i64) -> DomainResult<i64> {
    if stock < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    Ok(stock)
}
