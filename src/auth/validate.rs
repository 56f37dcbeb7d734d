//! Input validation for the authentication boundary.

/// Validate email address format.
///
/// Basic validation: exactly one `@`, non-empty local and domain parts, a dot
/// in the domain, sane length.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local_chars =
        |c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '_';
    let valid_domain_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-';

    if !local.chars().all(valid_local_chars) {
        return false;
    }
    if !domain.chars().all(valid_domain_chars) {
        return false;
    }

    // Domain parts between dots must be non-empty
    domain.split('.').all(|part| !part.is_empty())
}

/// Validate password strength: at least 8 characters with a letter, a digit
/// and a special character.
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Validate a phone number: optional leading `+`, then 2 to 15 digits not
/// starting with zero.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.com"));
        assert!(is_valid_email("user+tag@subdomain.example.com"));
        assert!(is_valid_email("user-name@example.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b")); // No dot in domain
    }

    #[test]
    fn strong_passwords_pass() {
        assert!(is_valid_password("s3cret!pw"));
        assert!(is_valid_password("Aa1!Aa1!"));
    }

    #[test]
    fn weak_passwords_fail() {
        assert!(!is_valid_password("short1!"));
        assert!(!is_valid_password("nodigits!"));
        assert!(!is_valid_password("nospecial1"));
        assert!(!is_valid_password("12345678!"));
    }

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("+14155550132"));
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("+1-415-555"));
        assert!(!is_valid_phone("1"));
    }
}
