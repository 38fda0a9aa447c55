//! # Custode (API Authentication Gate)
//!
//! `custode` is a small JSON API whose subject matter is authentication: who
//! may call a protected route, and as whom.
//!
//! ## Strategies
//!
//! The gate is configured at startup with one of three strategies:
//!
//! - **`none`**: every route is open; the gate is a pass-through.
//! - **`basic`**: each request must carry `Authorization: Basic <base64>`
//!   credentials, verified against the user directory on every call.
//! - **`session`**: a login endpoint exchanges credentials for an opaque
//!   session token delivered as an `HttpOnly` cookie; the gate resolves the
//!   cookie through an in-memory session store.
//!
//! ## Rejection policy
//!
//! Protected routes reject with `401 Unauthorized` when a request carries no
//! credential material at all, and `403 Forbidden` when credentials are
//! present but do not resolve to a user. Expected authentication failures
//! never panic; they degrade to an "absent user" which the pipeline turns
//! into one of those two rejections.
//!
//! ## PII
//!
//! Decoded Basic credentials travel as [`secrecy::SecretString`], form
//! structs mask their password field in `Debug`, and log lines that echo
//! form fields pass through the [`redact`] filter first. Passwords are never
//! persisted in the clear.

pub mod api;
pub mod auth;
pub mod cli;
pub mod directory;
pub mod password;
pub mod redact;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
