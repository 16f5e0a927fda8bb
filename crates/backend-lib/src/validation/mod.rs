// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation: field checks collected into a field → message
//! map reported back to the caller.

use carebridge_common::{CreateHospitalRequest, RegisterRequest};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::FieldErrors;

// Common validation constants
pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_REGISTRATION_NUMBER_LENGTH: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Lower-case an email for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Upper-case a registration number for storage and lookups.
pub fn normalize_registration_number(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validate an email address, returning a message on failure.
pub fn check_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email address cannot be empty.".to_string());
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Some(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters."
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Some("Invalid email address format.".to_string());
    }
    None
}

/// Validate a registration request. Uniqueness of the email is enforced
/// by the store; everything shape-level is checked here.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(msg) = check_email(req.email.trim()) {
        errors.insert("email".to_string(), msg);
    }
    if req.first_name.trim().is_empty() {
        errors.insert("first_name".to_string(), "First name is required.".to_string());
    } else if req.first_name.len() > MAX_NAME_LENGTH {
        errors.insert(
            "first_name".to_string(),
            format!("First name cannot exceed {MAX_NAME_LENGTH} characters."),
        );
    }
    if req.last_name.trim().is_empty() {
        errors.insert("last_name".to_string(), "Last name is required.".to_string());
    } else if req.last_name.len() > MAX_NAME_LENGTH {
        errors.insert(
            "last_name".to_string(),
            format!("Last name cannot exceed {MAX_NAME_LENGTH} characters."),
        );
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password".to_string(),
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        );
    } else if req.password.len() > MAX_PASSWORD_LENGTH {
        errors.insert(
            "password".to_string(),
            format!("Password cannot exceed {MAX_PASSWORD_LENGTH} characters."),
        );
    }
    if req.password != req.password_confirm {
        errors.insert(
            "password_confirm".to_string(),
            "Passwords do not match.".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a hospital registration request. Registration-number
/// uniqueness is enforced by the store.
pub fn validate_new_hospital(req: &CreateHospitalRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if req.name.trim().is_empty() {
        errors.insert("name".to_string(), "Hospital name is required.".to_string());
    }
    if req.registration_number.trim().is_empty() {
        errors.insert(
            "registration_number".to_string(),
            "Registration number is required.".to_string(),
        );
    } else if req.registration_number.len() > MAX_REGISTRATION_NUMBER_LENGTH {
        errors.insert(
            "registration_number".to_string(),
            format!(
                "Registration number cannot exceed {MAX_REGISTRATION_NUMBER_LENGTH} characters."
            ),
        );
    }
    if let Some(msg) = check_email(req.email.trim()) {
        errors.insert("email".to_string(), msg);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: String::new(),
            password: "password123".to_string(),
            password_confirm: "password123".to_string(),
        }
    }

    #[test]
    fn test_check_email() {
        assert!(check_email("test@example.com").is_none());
        assert!(check_email("user.name+tag@example.co.uk").is_none());

        // No @
        assert!(check_email("test.example.com").is_some());
        // No domain
        assert!(check_email("test@").is_some());
        // No TLD
        assert!(check_email("test@example").is_some());
        assert!(check_email("").is_some());
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&register_request()).is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut req = register_request();
        req.password = "short".to_string();
        req.password_confirm = "short".to_string();
        let errors = validate_registration(&req).unwrap_err();
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let mut req = register_request();
        req.password_confirm = "different123".to_string();
        let errors = validate_registration(&req).unwrap_err();
        assert!(errors.contains_key("password_confirm"));
    }

    #[test]
    fn missing_names_are_rejected() {
        let mut req = register_request();
        req.first_name = "  ".to_string();
        req.last_name = String::new();
        let errors = validate_registration(&req).unwrap_err();
        assert!(errors.contains_key("first_name"));
        assert!(errors.contains_key("last_name"));
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_email(" Ada@X.COM "), "ada@x.com");
        assert_eq!(normalize_registration_number(" reg-001 "), "REG-001");
    }

    #[test]
    fn hospital_requires_name_and_registration_number() {
        let req = CreateHospitalRequest {
            name: String::new(),
            registration_number: String::new(),
            email: "contact@acme.org".to_string(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
        };
        let errors = validate_new_hospital(&req).unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("registration_number"));
    }
}
