// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → message, reported to callers on validation failure.
pub type FieldErrors = BTreeMap<String, String>;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This account has been deactivated")]
    AccountDisabled,

    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("User not found")]
    UserNotFound,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error("Membership not found")]
    MembershipNotFound,

    #[error("This user is already a member of this hospital")]
    AlreadyMember,

    #[error("This nurse already belongs to another hospital")]
    NurseAlreadyAssigned,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a single-field validation error.
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        AppError::Validation(errors)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::AlreadyMember
            | AppError::NurseAlreadyAssigned
            | AppError::TokenInvalid
            | AppError::MissingRefreshToken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::AccountDisabled
            | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::HospitalNotFound | AppError::MembershipNotFound => {
                StatusCode::NOT_FOUND
            },
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::AccountDisabled => "AUTH_002",
            AppError::Unauthenticated => "AUTH_003",
            AppError::Forbidden(_) => "PERM_001",
            AppError::UserNotFound => "NF_001",
            AppError::HospitalNotFound => "NF_002",
            AppError::MembershipNotFound => "NF_003",
            AppError::AlreadyMember => "STAFF_001",
            AppError::NurseAlreadyAssigned => "STAFF_002",
            AppError::TokenInvalid => "TOKEN_001",
            AppError::MissingRefreshToken => "TOKEN_002",
            AppError::RateLimitExceeded => "RATE_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use.
    ///
    /// Credential failures collapse to one generic message so a caller
    /// cannot distinguish a wrong password from an unknown email.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid email or password.".to_string(),
            AppError::AccountDisabled => "This account has been deactivated.".to_string(),
            AppError::Unauthenticated => {
                "Authentication credentials were not provided.".to_string()
            },
            AppError::Forbidden(reason) => (*reason).to_string(),
            AppError::Validation(_) => "Validation failed.".to_string(),
            AppError::UserNotFound => "User not found.".to_string(),
            AppError::HospitalNotFound => "Hospital not found.".to_string(),
            AppError::MembershipNotFound => "Membership not found.".to_string(),
            AppError::AlreadyMember => {
                "This user is already a member of this hospital.".to_string()
            },
            AppError::NurseAlreadyAssigned => {
                "This nurse already belongs to another hospital. \
                 A nurse can only be assigned to one hospital at a time."
                    .to_string()
            },
            AppError::TokenInvalid => "Invalid or expired refresh token.".to_string(),
            AppError::MissingRefreshToken => "Refresh token is required.".to_string(),
            AppError::RateLimitExceeded => {
                "Rate limit exceeded, please try again later.".to_string()
            },
            AppError::Io(_) | AppError::Internal(_) => {
                "An internal server error occurred.".to_string()
            },
            AppError::Json(_) => "Invalid request format.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.sanitized_message();

        let body = match &self {
            AppError::Validation(fields) => serde_json::json!({
                "error": {
                    "code": error_code,
                    "message": message,
                    "fields": fields,
                }
            }),
            _ => serde_json::json!({
                "error": {
                    "code": error_code,
                    "message": message,
                }
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AccountDisabled.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::HospitalNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NurseAlreadyAssigned.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TokenInvalid.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_001");
        assert_eq!(AppError::AlreadyMember.error_code(), "STAFF_001");
        assert_eq!(AppError::NurseAlreadyAssigned.error_code(), "STAFF_002");
        assert_eq!(AppError::TokenInvalid.error_code(), "TOKEN_001");
        assert_eq!(AppError::field("email", "taken").error_code(), "VAL_001");
    }

    #[test]
    fn credential_failures_do_not_leak_which_part_was_wrong() {
        // Same sanitized message whether the email was unknown or the
        // password was wrong.
        assert_eq!(
            AppError::InvalidCredentials.sanitized_message(),
            "Invalid email or password."
        );
    }

    #[test]
    fn test_validation_response_includes_fields() {
        let err = AppError::field("email", "A user with this email already exists.");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.contains("application/json"));
    }
}
