//! Demo endpoints exercising the two rejection classes. Both are excluded
//! from the gate so their bodies stay reachable without credentials.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/unauthorized",
    responses(
        (status = 401, description = "Always unauthorized")
    ),
    tag = "status"
)]
pub async fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/forbidden",
    responses(
        (status = 403, description = "Always forbidden")
    ),
    tag = "status"
)]
pub async fn forbidden() -> impl IntoResponse {
    (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" })))
}
