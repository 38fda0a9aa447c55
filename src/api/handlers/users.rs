//! User registration and current-user endpoints.

use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use super::valid_email;
use crate::{
    auth::AuthState,
    directory::{InsertOutcome, User},
    password,
};

#[derive(Deserialize, ToSchema)]
pub struct RegisterForm {
    email: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Missing or invalid field, or email already registered"),
    ),
    tag = "users"
)]
pub async fn register(
    Extension(state): Extension<Arc<AuthState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let Some(email) = form.email.filter(|email| !email.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "email missing" })),
        )
            .into_response();
    };
    let Some(password) = form.password.filter(|password| !password.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "password missing" })),
        )
            .into_response();
    };

    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid email" })),
        )
            .into_response();
    }

    let digest = match password::hash(&password) {
        Ok(digest) => digest,
        Err(err) => {
            error!("Failed to hash password: {err}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match state.directory().insert(&email, &digest).await {
        Ok(InsertOutcome::Created(user)) => (
            StatusCode::CREATED,
            Json(json!({ "email": user.email, "message": "user created" })),
        )
            .into_response(),
        Ok(InsertOutcome::Duplicate) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "email already registered" })),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to register user: {err}");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 404, description = "No authenticated user"),
    ),
    tag = "users"
)]
pub async fn me(user: Option<Extension<User>>) -> Response {
    match user {
        Some(Extension(user)) => (StatusCode::OK, Json(user)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}
