// ============================
// carebridge-common/src/lib.rs
// ============================
//! Shared vocabulary between the `CareBridge` backend and its clients:
//! roles, hospital statuses, and the request/response bodies of the
//! HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds within one hospital.
///
/// Roles are a small fixed set, scoped per hospital. They are not a
/// permission graph; every authorization decision reduces to "is the
/// caller's active role in the required set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    HospitalAdmin,
    MedicalAdmin,
    Nurse,
}

impl Role {
    /// Human-readable label, used in denial messages.
    pub fn label(self) -> &'static str {
        match self {
            Role::HospitalAdmin => "Hospital Admin",
            Role::MedicalAdmin => "Medical Admin",
            Role::Nurse => "Nurse",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of a hospital on the platform.
///
/// Hospitals register as `Pending` and only a platform superadmin moves
/// them between statuses. Any status is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HospitalStatus {
    Pending,
    Active,
    Suspended,
}

impl std::fmt::Display for HospitalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HospitalStatus::Pending => "pending",
            HospitalStatus::Active => "active",
            HospitalStatus::Suspended => "suspended",
        };
        f.write_str(s)
    }
}

/// An access/refresh token pair as returned by login, registration and
/// token refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// ---------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of the logout and token-refresh endpoints. The token is
/// optional at the serde level so a missing field can be reported as a
/// field error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHospitalRequest {
    pub name: String,
    pub registration_number: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Partial update of a hospital's contact details. Status is never
/// touched through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHospitalRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: HospitalStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStaffRequest {
    pub email: String,
    pub role: Role,
}

/// Partial update of a staff membership: change the role, deactivate,
/// or reactivate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStaffRequest {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------

/// A user's role in one hospital, as embedded in their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipSummary {
    pub hospital_id: Uuid,
    pub hospital_name: String,
    pub hospital_status: HospitalStatus,
    pub role: Role,
    pub is_active: bool,
}

/// Safe read representation of a user. Never carries the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    pub date_joined: DateTime<Utc>,
    pub memberships: Vec<MembershipSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalView {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub status: HospitalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read representation of a membership, used in staff listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Body returned by register and login: the user plus a token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::HospitalAdmin).unwrap(),
            "\"hospital_admin\""
        );
        assert_eq!(serde_json::to_string(&Role::Nurse).unwrap(), "\"nurse\"");
        let parsed: Role = serde_json::from_str("\"medical_admin\"").unwrap();
        assert_eq!(parsed, Role::MedicalAdmin);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HospitalStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: HospitalStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(parsed, HospitalStatus::Suspended);
    }

    #[test]
    fn refresh_request_tolerates_missing_field() {
        let parsed: RefreshRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.refresh.is_none());
    }
}
