use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_infra::carts::CartError;
use catalog_infra::catalog::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CatalogError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("product {id} not found"))
        }
        CatalogError::StoreUnavailable(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable", msg)
        }
    }
}

pub fn cart_error_to_response(err: CartError) -> axum::response::Response {
    match err {
        CartError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        e @ (CartError::CartNotFound(_) | CartError::ProductNotFound(_) | CartError::LineNotFound(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        CartError::StoreUnavailable(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable", msg)
        }
    }
}

/// Unreadable bodies (bad JSON, wrong field types, missing content type) are
/// reported like any other validation failure.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn invalid_id(what: &str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
