//! Demo handlers.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("item not found: {0}")]
    NotFound(u64),
    #[error("bad item id: {0}")]
    BadId(String),
    #[error("upstream unavailable")]
    Unavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadId(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn index() -> impl IntoResponse {
    (StatusCode::OK, "webmetrics gateway")
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

/// `0` is never a valid item.
pub async fn item(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let id: u64 = id.parse().map_err(|_| ApiError::BadId(id.clone()))?;
    if id == 0 {
        return Err(ApiError::NotFound(id));
    }
    Ok(Json(json!({ "id": id, "name": format!("item-{id}") })))
}

pub async fn fail() -> Result<(), ApiError> {
    Err(ApiError::Unavailable)
}
