use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn welcome() -> &'static str {
    "Welcome to the API"
}
