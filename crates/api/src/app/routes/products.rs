use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_core::ProductId;
use catalog_products::{NewProduct, ProductPatch};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let request = query.page_request(services.paginator().max_limit());
    match services.paginator().paginate(&query.filter(), request) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    match services.catalog().get(id) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.catalog().create(body) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.catalog().update(id, body) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return errors::invalid_id("product");
    };
    match services.catalog().delete(id) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id.to_string(), "deleted": true })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
