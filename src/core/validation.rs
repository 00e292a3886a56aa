//! User input validation
//!
//! The only free-text input the bot accepts is the e-mail address that the
//! payment receipt is sent to.

use lazy_regex::regex_is_match;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is not an e-mail address
    #[error("Invalid e-mail address: {0:?}")]
    InvalidEmail(String),
}

/// Validates an e-mail address.
///
/// Accepts `local-part@label(.label)*.tld` where the TLD has at least two
/// letters. ASCII only, no whitespace anywhere (the text is NOT trimmed),
/// exactly one `@`, letters in any case.
///
/// # Examples
/// ```
/// use tubecomy::core::validation::validate_email;
///
/// assert!(validate_email("a@b.co").is_ok());
/// assert!(validate_email("name.surname@example.com").is_ok());
///
/// assert!(validate_email("foo@bar").is_err());
/// assert!(validate_email("no-at-sign.com").is_err());
/// assert!(validate_email("a@@b.com").is_err());
/// assert!(validate_email(" a@b.com").is_err());
/// ```
pub fn validate_email(text: &str) -> Result<&str, ValidationError> {
    let valid = text.is_ascii()
        && regex_is_match!(
            r"^[A-Za-z0-9._%+\-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
            text
        );

    if valid {
        Ok(text)
    } else {
        Err(ValidationError::InvalidEmail(text.to_string()))
    }
}
