//! Target validation and masking for email addresses and mobile numbers

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
});

// International phone number regex (E.164 format)
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").unwrap());

/// Remove common formatting characters from a mobile number
pub fn normalize_mobile(mobile: &str) -> String {
    mobile
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if an email address is well formed
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Check if a mobile number is valid (international E.164 format)
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(&normalize_mobile(mobile))
}

/// Mask an email address or mobile number for log output
///
/// `john@x.com` becomes `jo***@x.com`, `+12345678901` becomes `+1******8901`.
pub fn mask_target(target: &str) -> String {
    if let Some((local, domain)) = target.split_once('@') {
        let visible: String = local.chars().take(2).collect();
        return format!("{}***@{}", visible, domain);
    }

    let chars: Vec<char> = target.chars().collect();
    if chars.len() < 7 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 6), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@x.com"));
        assert!(is_valid_email("First.Last+tag@mail.example.org"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("userx.com"));
        assert!(!is_valid_email("user@x"));
    }

    #[test]
    fn test_mobile_validation() {
        assert!(is_valid_mobile("+12345678901"));
        assert!(is_valid_mobile("+44 1234 567 890"));
        assert!(!is_valid_mobile("12345678901")); // No +
        assert!(!is_valid_mobile("+0123456789"));
        assert!(!is_valid_mobile("+1234567890123456"));
    }

    #[test]
    fn test_mask_target() {
        assert_eq!(mask_target("john@x.com"), "jo***@x.com");
        assert_eq!(mask_target("+12345678901"), "+1******8901");
        assert_eq!(mask_target("+1555"), "****");
    }
}
