use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> axum::response::Response {
    crate::app::errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
