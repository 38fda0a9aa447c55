//! Credential codec for HTTP Basic authentication.

use base64::Engine;
use secrecy::SecretString;

/// Decode an `Authorization` header value into an `(email, password)` pair.
///
/// Returns `None` when the scheme prefix is missing, the payload is not valid
/// base64 or UTF-8, or there is no `:` separator. The password is wrapped in
/// [`SecretString`] so it cannot end up in a log line by accident.
pub fn decode(header: &str) -> Option<(String, SecretString)> {
    let encoded = header.strip_prefix("Basic ")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (email, password) = text.split_once(':')?;
    Some((email.to_string(), SecretString::from(password.to_string())))
}
