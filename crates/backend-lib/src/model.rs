// ============================
// carebridge-backend-lib/src/model.rs
// ============================
//! Persisted domain entities: users, hospitals and the memberships
//! binding them together.

use carebridge_common::{HospitalStatus, HospitalView, MembershipView, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Never hard-deleted; deactivation flips
/// `is_active` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Stored lower-cased; lookups are case-insensitive.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_superadmin: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        phone: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            phone,
            password_hash,
            is_active: true,
            is_superadmin: false,
            date_joined: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        let raw = format!("{} {}", self.first_name, self.last_name);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// A tenant. Registered in `Pending` status; only a platform superadmin
/// changes the status afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    /// Stored upper-cased; globally unique case-insensitively.
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

impl Hospital {
    pub fn view(&self) -> HospitalView {
        HospitalView {
            id: self.id,
            name: self.name.clone(),
            registration_number: self.registration_number.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Links a user to a hospital with a role.
///
/// At most one row exists per (user, hospital) pair, ever. Removal
/// flips `is_active`; re-adding reactivates the same row, so the row id
/// is stable across the whole history of the relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hospital_id: Uuid,
    pub role: Role,
    pub is_active: bool,
    /// Cleared (not cascaded) if the inviter is ever removed.
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: Uuid, hospital_id: Uuid, role: Role, invited_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            hospital_id,
            role,
            is_active: true,
            invited_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Join with the member's user row for staff listings.
    pub fn view(&self, user: &User) -> MembershipView {
        MembershipView {
            id: self.id,
            user_id: self.user_id,
            user_email: user.email.clone(),
            user_full_name: user.full_name(),
            role: self.role,
            is_active: self.is_active,
            invited_by: self.invited_by,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_collapses_whitespace() {
        let user = User::new(
            "a@x.com".to_string(),
            "  Ada ".to_string(),
            " Lovelace ".to_string(),
            String::new(),
            "hash".to_string(),
        );
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn new_membership_is_active() {
        let m = Membership::new(Uuid::new_v4(), Uuid::new_v4(), Role::Nurse, None);
        assert!(m.is_active);
        assert_eq!(m.role, Role::Nurse);
        assert!(m.invited_by.is_none());
    }
}
