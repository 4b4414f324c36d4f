use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use catalog_core::{CartId, ProductId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_cart))
        .route("/:cid", get(get_cart).put(replace_cart).delete(clear_cart))
        .route("/:cid/product/:pid", post(add_product))
        .route(
            "/:cid/products/:pid",
            put(set_quantity).delete(remove_product),
        )
}

fn parse_ids(cid: &str, pid: &str) -> Result<(CartId, ProductId), axum::response::Response> {
    let cart_id = cid.parse::<CartId>().map_err(|_| errors::invalid_id("cart"))?;
    let product_id = pid.parse::<ProductId>().map_err(|_| errors::invalid_id("product"))?;
    Ok((cart_id, product_id))
}

fn cart_response(result: Result<catalog_carts::Cart, catalog_infra::carts::CartError>) -> axum::response::Response {
    match result {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn create_cart(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.carts().create() {
        Ok(cart) => (StatusCode::CREATED, Json(cart)).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cid): Path<String>,
) -> axum::response::Response {
    let Ok(cart_id) = cid.parse::<CartId>() else {
        return errors::invalid_id("cart");
    };
    cart_response(services.carts().get(cart_id))
}

/// Body is optional; without one a single unit is added.
pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path((cid, pid)): Path<(String, String)>,
    body: Bytes,
) -> axum::response::Response {
    let (cart_id, product_id) = match parse_ids(&cid, &pid) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        dto::AddToCartRequest::default()
    } else {
        match serde_json::from_slice::<dto::AddToCartRequest>(&body) {
            Ok(request) => request,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        }
    };
    let raw = request.quantity.unwrap_or(1);
    let quantity = match dto::quantity_from_json(raw) {
        Ok(q) => q,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };
    cart_response(services.carts().add_product(cart_id, product_id, quantity))
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path((cid, pid)): Path<(String, String)>,
    body: Result<Json<dto::SetQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (cart_id, product_id) = match parse_ids(&cid, &pid) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let quantity = match dto::quantity_from_json(body.quantity) {
        Ok(q) => q,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };
    cart_response(services.carts().set_quantity(cart_id, product_id, quantity))
}

pub async fn remove_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path((cid, pid)): Path<(String, String)>,
) -> axum::response::Response {
    let (cart_id, product_id) = match parse_ids(&cid, &pid) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    cart_response(services.carts().remove_product(cart_id, product_id))
}

pub async fn replace_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cid): Path<String>,
    body: Result<Json<dto::ReplaceCartRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(cart_id) = cid.parse::<CartId>() else {
        return errors::invalid_id("cart");
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let lines = match body.into_lines() {
        Ok(lines) => lines,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };
    cart_response(services.carts().replace_lines(cart_id, lines))
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(cid): Path<String>,
) -> axum::response::Response {
    let Ok(cart_id) = cid.parse::<CartId>() else {
        return errors::invalid_id("cart");
    };
    cart_response(services.carts().clear(cart_id))
}
