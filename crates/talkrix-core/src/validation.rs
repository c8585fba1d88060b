use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Enter a valid phone number in E.164 format")]
    InvalidPhone,
    #[error("Enter a valid http(s) URL")]
    InvalidUrl,
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
    },
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"))
}

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{6,14}$").expect("phone pattern"))
}

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    required("Email", value)?;
    if !email_re().is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn phone(value: &str) -> Result<(), ValidationError> {
    required("Phone number", value)?;
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !phone_re().is_match(&compact) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

pub fn url(value: &str) -> Result<(), ValidationError> {
    required("URL", value)?;
    let trimmed = value.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

pub fn in_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

pub fn login(email_value: &str, password: &str) -> Result<(), ValidationError> {
    email(email_value)?;
    required("Password", password)
}

pub fn register(
    name: &str,
    email_value: &str,
    password: &str,
    confirm: Option<&str>,
) -> Result<(), ValidationError> {
    required("Name", name)?;
    email(email_value)?;
    required("Password", password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if let Some(confirm) = confirm {
        if confirm != password {
            return Err(ValidationError::PasswordMismatch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_name_is_required() {
        assert_eq!(required("Name", "  "), Err(ValidationError::Required("Name")));
        assert_eq!(
            ValidationError::Required("Name").to_string(),
            "Name is required"
        );
    }

    #[test]
    fn login_checks_email_shape() {
        assert_eq!(login("ada", "pw"), Err(ValidationError::InvalidEmail));
        assert_eq!(login("ada@example.com", ""), Err(ValidationError::Required("Password")));
        assert_eq!(login("ada@example.com", "pw"), Ok(()));
    }

    #[test]
    fn register_enforces_password_rules() {
        assert_eq!(
            register("Ada", "ada@example.com", "short", None),
            Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN))
        );
        assert_eq!(
            register("Ada", "ada@example.com", "long-enough", Some("different")),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(register("Ada", "ada@example.com", "long-enough", None), Ok(()));
    }

    #[test]
    fn phone_accepts_formatted_numbers() {
        assert_eq!(phone("+1 (555) 010-2030"), Ok(()));
        assert_eq!(phone("12"), Err(ValidationError::InvalidPhone));
        assert_eq!(phone(""), Err(ValidationError::Required("Phone number")));
    }

    #[test]
    fn range_check_reports_bounds() {
        assert_eq!(
            in_range("Max concurrent calls", 0, 1, 100),
            Err(ValidationError::OutOfRange {
                field: "Max concurrent calls",
                min: 1,
                max: 100
            })
        );
    }
}
