//! PII redaction for log lines.
//!
//! Log messages that echo form fields are `key=value` pairs joined by a
//! separator; every value of a listed field is replaced with the redaction
//! marker before the line reaches the subscriber.

use regex::Regex;

/// Replacement written over redacted values.
pub const REDACTION: &str = "***";

/// Fields considered personally identifiable in log output.
pub const PII_FIELDS: &[&str] = &["name", "email", "phone", "ssn", "password"];

/// Obfuscate the value of every listed field in a `separator`-delimited
/// message. Fields not present in the message are left untouched.
#[must_use]
pub fn filter_fields(fields: &[&str], redaction: &str, message: &str, separator: char) -> String {
    let mut filtered = message.to_string();
    let separator = regex::escape(&separator.to_string());
    for field in fields {
        if let Ok(re) = Regex::new(&format!("{}=[^{}]*", regex::escape(field), separator)) {
            filtered = re
                .replace_all(&filtered, format!("{field}={redaction}"))
                .into_owned();
        }
    }
    filtered
}
