use utoipa::OpenApi;

use crate::api::handlers;
use crate::directory::User;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::demo::unauthorized,
        handlers::demo::forbidden,
        handlers::session_login::login,
        handlers::session_login::logout,
        handlers::users::register,
        handlers::users::me,
    ),
    components(schemas(
        User,
        handlers::session_login::LoginForm,
        handlers::users::RegisterForm
    )),
    tags(
        (name = "status", description = "Service status and rejection demos"),
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "User registration and lookup")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/status",
            "/api/v1/unauthorized",
            "/api/v1/forbidden",
            "/api/v1/auth_session/login",
            "/api/v1/auth_session/logout",
            "/api/v1/users",
            "/api/v1/users/me",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }
}
