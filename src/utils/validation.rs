//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

/// Join codes as typed by participants (case-insensitive)
pub static JOIN_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z0-9]{4,16}\s*$").expect("valid join code regex"));

/// Validate a join code
pub fn validate_join_code(code: &str) -> Result<(), &'static str> {
    if JOIN_CODE_RE.is_match(code) {
        Ok(())
    } else {
        Err("Join code must be 4-16 letters or digits")
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
