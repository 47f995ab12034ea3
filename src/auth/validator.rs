//! Identifier format validation for the login form.
//!
//! The portal accepts identifiers of 3-21 characters: an ASCII letter
//! followed by 2-20 ASCII letters or digits. Validation is pure and runs
//! synchronously on every keystroke, so the verdict always reflects the
//! latest input.

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{2,20}$").unwrap());

/// Message shown under the identifier input while the format is acceptable.
pub const VALID_FORMAT_MESSAGE: &str = "Valid ID format.";

/// Message shown under the identifier input while the format is rejected.
pub const INVALID_FORMAT_MESSAGE: &str =
    "ID must be 3-21 letters and digits, starting with a letter.";

/// Verdict for a single identifier string, paired with the user-facing
/// message to display under the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: &'static str,
}

/// Validate a login identifier against the portal's format rule.
/// Empty input is invalid.
pub fn validate(identifier: &str) -> ValidationResult {
    if IDENTIFIER_RE.is_match(identifier) {
        ValidationResult {
            is_valid: true,
            message: VALID_FORMAT_MESSAGE,
        }
    } else {
        ValidationResult {
            is_valid: false,
            message: INVALID_FORMAT_MESSAGE,
        }
    }
}
