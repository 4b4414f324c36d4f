use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::ProductId;
use catalog_products::Product;

/// What happened to the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// Notification that a catalog write has committed.
///
/// Carries the product's current field values for `created`/`updated`, only the
/// id for `deleted`. It is a liveness signal: a viewer that missed events
/// reconciles with a fresh paginated read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    kind: ChangeKind,
    product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<Product>,
    occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn created(product: Product, occurred_at: DateTime<Utc>) -> Self {
        Self {
            kind: ChangeKind::Created,
            product_id: product.id(),
            product: Some(product),
            occurred_at,
        }
    }

    pub fn updated(product: Product, occurred_at: DateTime<Utc>) -> Self {
        Self {
            kind: ChangeKind::Updated,
            product_id: product.id(),
            product: Some(product),
            occurred_at,
        }
    }

    pub fn deleted(product_id: ProductId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            product_id,
            product: None,
            occurred_at,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Stable event name (e.g. "products.product.updated").
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            ChangeKind::Created => "products.product.created",
            ChangeKind::Updated => "products.product.updated",
            ChangeKind::Deleted => "products.product.deleted",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
