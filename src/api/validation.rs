//! Input checks for request DTOs. Presence and shape only.

use regex::Regex;

use crate::errors::AppError;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Returns the trimmed value, or an error naming the field when it is missing or blank.
pub fn require_text(field: &str, value: Option<&str>, max: usize) -> Result<String, AppError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", field)))?;

    if !ensure_max_len(value, max) {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }

    Ok(value.to_string())
}

pub fn require_email(value: Option<&str>) -> Result<String, AppError> {
    let email = normalize_email(&require_text("email", value, MAX_NAME_LEN)?);
    if !validate_email(&email) {
        return Err(AppError::InvalidInput("email is not a valid address".to_string()));
    }
    Ok(email)
}

pub fn require_password(value: Option<&str>) -> Result<String, AppError> {
    let password = value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::InvalidInput("password is required".to_string()))?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(password.to_string())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::InvalidInput(
            "latitude must be between -90 and 90".to_string(),
        ));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::InvalidInput(
            "longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            require_email(Some("  Agent.Smith@Example.COM ")).unwrap(),
            "agent.smith@example.com"
        );
        assert!(require_email(Some("not-an-email")).is_err());
        assert!(require_email(None).is_err());
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let err = require_text("title", Some("   "), MAX_TITLE_LEN).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(require_text("title", Some(" Hi "), 10).unwrap(), "Hi");
        assert!(require_text("title", Some("too long"), 3).is_err());
    }

    #[test]
    fn coordinates_must_be_on_the_globe() {
        assert!(validate_coordinates(12.97, 77.59).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(require_password(Some("12345")).is_err());
        assert!(require_password(Some("123456")).is_ok());
        assert!(require_password(Some("")).is_err());
    }
}
