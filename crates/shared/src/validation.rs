//! Common validation utilities.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Digits with optional leading `+`, spaces, dashes and parentheses.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9(][0-9 ()\-]{5,18}[0-9]$").unwrap();
}

const PHONE_MIN_LEN: usize = 7;
const PHONE_MAX_LEN: usize = 20;

/// Validates that a phone number is 7-20 characters of digits and separators.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    // The regex alone allows one extra char when the number starts with `+`.
    let len_ok = (PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&phone.len());
    if len_ok && PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be 7-20 digits, spaces, dashes or parentheses".into());
        Err(err)
    }
}

/// Validates that a birthday is not in the future.
pub fn validate_birthday(birthday: &NaiveDate) -> Result<(), ValidationError> {
    if *birthday <= Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("birthday_future");
        err.message = Some("Birthday cannot be in the future".into());
        Err(err)
    }
}

/// Validates that a string contains something besides whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_phone_accepts_common_formats() {
        assert!(validate_phone("+380501234567").is_ok());
        assert!(validate_phone("050 123 45 67").is_ok());
        assert!(validate_phone("(050) 123-4567").is_ok());
        assert!(validate_phone("1234567").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_garbage() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("+1 555 CALL NOW").is_err());
        assert!(validate_phone(&"1".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_phone_length_includes_plus() {
        assert!(validate_phone(&format!("+{}", "1".repeat(19))).is_ok());
        assert!(validate_phone(&format!("+{}", "1".repeat(20))).is_err());
        assert!(validate_phone(&"1".repeat(20)).is_ok());
    }

    #[test]
    fn test_validate_phone_error_code() {
        let err = validate_phone("abc").unwrap_err();
        assert_eq!(err.code, "phone_format");
    }

    #[test]
    fn test_validate_birthday() {
        let today = Utc::now().date_naive();
        assert!(validate_birthday(&today).is_ok());
        assert!(validate_birthday(&NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()).is_ok());
        assert!(validate_birthday(&(today + Duration::days(2))).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Kyiv").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }
}
