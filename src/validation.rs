//! Syntactic checks shared by the service layer.

/// True when `email` is non-blank and parses as a mail address
/// (`local@domain` per the HTML5 / RFC 5322 subset `validator` implements).
pub fn validate_email(email: &str) -> bool {
    if email.trim().is_empty() {
        return false;
    }
    validator::validate_email(email)
}
