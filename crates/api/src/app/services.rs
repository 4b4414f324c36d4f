use std::sync::Arc;

use catalog_events::{FanoutNotifier, SubscriberRegistry};
use catalog_infra::{
    carts::{CartService, InMemoryCartStore},
    catalog::{CatalogService, InMemoryCatalogStore, Paginator},
    config::AppConfig,
};

pub type Catalog = CatalogService<Arc<InMemoryCatalogStore>, FanoutNotifier>;
pub type Carts = CartService<Arc<InMemoryCartStore>, Arc<InMemoryCatalogStore>>;

/// Shared service graph handed to every handler through an `Extension`.
///
/// The catalog store is shared by the mutation service, the paginator and the
/// cart service; the subscriber registry is shared by the notifier and the
/// real-time stream endpoint.
#[derive(Debug)]
pub struct AppServices {
    config: AppConfig,
    registry: Arc<SubscriberRegistry>,
    catalog: Catalog,
    paginator: Paginator<Arc<InMemoryCatalogStore>>,
    carts: Carts,
}

impl AppServices {
    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryCatalogStore::new());
        let registry = Arc::new(SubscriberRegistry::with_queue_capacity(
            config.subscriber_queue_capacity,
        ));

        let catalog = CatalogService::new(store.clone(), FanoutNotifier::new(registry.clone()));
        let paginator = Paginator::with_max_limit(store.clone(), config.max_page_limit);
        let carts = CartService::new(Arc::new(InMemoryCartStore::new()), store);

        tracing::info!(
            queue_capacity = config.subscriber_queue_capacity,
            max_page_limit = config.max_page_limit,
            "in-memory services ready"
        );

        Self {
            config,
            registry,
            catalog,
            paginator,
            carts,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn paginator(&self) -> &Paginator<Arc<InMemoryCatalogStore>> {
        &self.paginator
    }

    pub fn carts(&self) -> &Carts {
        &self.carts
    }

    /// End every open real-time stream and refuse new subscribers.
    pub fn shutdown(&self) {
        let open = self.registry.len();
        self.registry.close_all();
        tracing::info!(open_subscribers = open, "real-time registry closed");
    }
}
