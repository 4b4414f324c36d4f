use axum::{routing::get, Router};

pub mod carts;
pub mod products;
pub mod realtime;
pub mod system;
pub mod views;

/// Router for every endpoint except the health/welcome probes.
pub fn router() -> Router {
    Router::new()
        .nest("/api/products", products::router())
        .nest("/api/carts", carts::router())
        .route("/home", get(views::home))
        .route("/realtimeproducts", get(views::realtime_products))
        .route("/realtimeproducts/stream", get(realtime::stream))
}
