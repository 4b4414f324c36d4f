//! JSON view models for the catalog pages. Rendering is left to the client.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use catalog_infra::catalog::ProductFilter;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// GET /home?page&limit&sort
pub async fn home(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let request = query.page_request(services.paginator().max_limit());
    match services.paginator().paginate(&ProductFilter::default(), request) {
        Ok(page) => (StatusCode::OK, Json(dto::HomeView::from(page))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// GET /realtimeproducts
///
/// Initial snapshot for a live view; later changes arrive on the stream.
pub async fn realtime_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog().list_all() {
        Ok(products) => (
            StatusCode::OK,
            Json(dto::RealtimeView {
                products,
                stream: super::realtime::STREAM_PATH,
            }),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
