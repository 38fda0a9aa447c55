//! The auth gate: strategy selection, path exclusion, and per-request user
//! resolution.
//!
//! The strategy is chosen once at startup (`--auth-type`) and dispatched as an
//! explicit enum rather than trait objects per request. The gate runs as a
//! middleware layer in front of every route: excluded paths pass through,
//! requests with no credential material are rejected with 401, and requests
//! whose credentials do not resolve to a user are rejected with 403.

pub mod basic;
pub mod session_store;

use anyhow::Result;
use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::directory::{User, UserDirectory};
use session_store::SessionStore;

/// Paths that never require authentication, compared exact but
/// trailing-slash-insensitive.
pub const EXCLUDED_PATHS: &[&str] = &[
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
];

/// Authentication strategy applied to protected routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthKind {
    /// No restriction; every route is open.
    None,
    /// `Authorization: Basic <base64>` verified against the directory.
    Basic,
    /// Opaque session cookie resolved through the session store.
    Session,
}

impl std::str::FromStr for AuthKind {
    type Err = String;

    fn from_str(kind: &str) -> std::result::Result<Self, Self::Err> {
        match kind {
            "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "session" => Ok(Self::Session),
            _ => Err(format!("unknown auth type: {kind}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    strategy: AuthKind,
    session_cookie_name: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(strategy: AuthKind) -> Self {
        Self {
            strategy,
            session_cookie_name: "_custode_session_id".to_string(),
        }
    }

    #[must_use]
    pub fn with_session_cookie_name(mut self, name: String) -> Self {
        self.session_cookie_name = name;
        self
    }

    #[must_use]
    pub fn strategy(&self) -> AuthKind {
        self.strategy
    }

    #[must_use]
    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }
}

/// Shared authentication state: configuration, session store, and the user
/// directory. Constructed once at startup and handed to the router as an
/// extension, never accessed as a global.
pub struct AuthState {
    config: AuthConfig,
    sessions: SessionStore,
    directory: Arc<dyn UserDirectory>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            directory,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn directory(&self) -> &dyn UserDirectory {
        self.directory.as_ref()
    }

    /// Resolve the request headers to an authenticated user under the
    /// configured strategy. Every expected failure (missing header, bad
    /// encoding, unknown user, wrong password, unknown session) degrades to
    /// `Ok(None)`; only infrastructure failures surface as errors.
    pub async fn resolve_user(&self, headers: &HeaderMap) -> Result<Option<User>> {
        match self.config.strategy {
            AuthKind::None => Ok(None),
            AuthKind::Basic => {
                let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
                else {
                    return Ok(None);
                };
                let Some((email, password)) = basic::decode(header) else {
                    return Ok(None);
                };
                let Some(user) = self.directory.find_by_email(&email).await? else {
                    return Ok(None);
                };
                if user.verify_secret(password.expose_secret()) {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            AuthKind::Session => {
                let Some(token) = session_cookie_value(headers, self.config.session_cookie_name())
                else {
                    return Ok(None);
                };
                let Some(user_id) = self.sessions.lookup(&token).await else {
                    return Ok(None);
                };
                self.directory.get(user_id).await
            }
        }
    }

    /// True when the request carries any credential material at all, the
    /// `Authorization` header or the session cookie, valid or not and
    /// regardless of which one the strategy consumes. Drives the 401 vs 403
    /// split: material present but unresolvable is 403, none at all is 401.
    fn has_credentials(&self, headers: &HeaderMap) -> bool {
        match self.config.strategy {
            AuthKind::None => false,
            AuthKind::Basic | AuthKind::Session => {
                headers.contains_key(AUTHORIZATION)
                    || session_cookie_value(headers, self.config.session_cookie_name()).is_some()
            }
        }
    }
}

/// True unless `path` matches an entry of `excluded_paths`, ignoring a
/// trailing slash on either side.
#[must_use]
pub fn requires_auth(path: &str, excluded_paths: &[&str]) -> bool {
    let normalized = path.trim_end_matches('/');
    !excluded_paths
        .iter()
        .any(|excluded| excluded.trim_end_matches('/') == normalized)
}

/// Read the session cookie value from the `Cookie` header, if present.
pub fn session_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == cookie_name {
            return Some(val.trim().to_string());
        }
    }
    None
}

/// Middleware guarding every route. Excluded paths and the `none` strategy
/// pass through untouched; otherwise the resolved user is stored in the
/// request extensions for downstream handlers.
pub async fn gate(
    Extension(state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if state.config().strategy() == AuthKind::None {
        return next.run(request).await;
    }

    if !requires_auth(request.uri().path(), EXCLUDED_PATHS) {
        return next.run(request).await;
    }

    if !state.has_credentials(request.headers()) {
        debug!("no credentials on protected path {}", request.uri().path());
        return rejection(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    match state.resolve_user(request.headers()).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => rejection(StatusCode::FORBIDDEN, "Forbidden"),
        Err(err) => {
            error!("Failed to resolve user: {err}");
            rejection(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
