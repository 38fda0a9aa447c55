//! Session login and logout endpoints.

use axum::{
    extract::{Extension, Form},
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{
    auth::{session_cookie_value, AuthConfig, AuthState},
    directory::User,
    redact,
};

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    email: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth_session/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful, session cookie set", body = User),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user found for this email"),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(state): Extension<Arc<AuthState>>,
    Form(form): Form<LoginForm>,
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

    debug!(
        "{}",
        redact::filter_fields(
            redact::PII_FIELDS,
            redact::REDACTION,
            &format!("login attempt; email={email};"),
            ';'
        )
    );

    let user = match state.directory().find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "no user found for this email" })),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to lookup user: {err}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !user.verify_secret(&password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "wrong password" })),
        )
            .into_response();
    }

    let token = match state.sessions().create(user.id).await {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to create session: {err}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = HeaderMap::new();
    match session_cookie(state.config(), &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (StatusCode::OK, headers, Json(user)).into_response()
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth_session/logout",
    responses(
        (status = 200, description = "Session destroyed, cookie cleared"),
        (status = 404, description = "No session for this cookie"),
    ),
    tag = "auth"
)]
pub async fn logout(Extension(state): Extension<Arc<AuthState>>, headers: HeaderMap) -> Response {
    let Some(token) = session_cookie_value(&headers, state.config().session_cookie_name()) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    };

    if !state.sessions().destroy(&token).await {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    }

    // Clear the cookie now that the session is gone.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::OK, response_headers, Json(json!({}))).into_response()
}

/// Build an `HttpOnly` cookie carrying the session token. No `Max-Age`:
/// sessions live until logout or process exit, never longer.
fn session_cookie(config: &AuthConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = config.session_cookie_name();
    HeaderValue::from_str(&format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax"))
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = config.session_cookie_name();
    HeaderValue::from_str(&format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"))
}
