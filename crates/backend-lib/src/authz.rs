// ============================
// carebridge-backend-lib/src/authz.rs
// ============================
//! Authorization policy: one primitive consulted by every
//! hospital-scoped operation.
//!
//! A membership conveys authorization only while active; roles and
//! active flags can change between requests, so the lookup is
//! re-evaluated every time and never cached.

use carebridge_common::Role;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{Membership, User};
use crate::storage::Store;

/// A required-role set plus the denial message shown when the caller
/// does not satisfy it.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub required: &'static [Role],
    pub message: &'static str,
}

/// Any active role in the hospital.
pub const HOSPITAL_MEMBER: Policy = Policy {
    required: &[Role::HospitalAdmin, Role::MedicalAdmin, Role::Nurse],
    message: "You must be a member of this hospital.",
};

pub const HOSPITAL_ADMIN_ONLY: Policy = Policy {
    required: &[Role::HospitalAdmin],
    message: "You must be a Hospital Admin to perform this action.",
};

pub const MEDICAL_ADMIN_ONLY: Policy = Policy {
    required: &[Role::MedicalAdmin],
    message: "You must be a Medical Admin to perform this action.",
};

pub const ADMIN_OR_MEDICAL_ADMIN: Policy = Policy {
    required: &[Role::HospitalAdmin, Role::MedicalAdmin],
    message: "You must be a Hospital Admin or Medical Admin.",
};

/// Decide whether `user` may act on `hospital_id` with one of the
/// required roles. Returns the active membership that grants access.
///
/// Denies when no hospital id is supplied, when no active membership
/// exists, or when the membership's role is not in the required set.
pub async fn authorize<S: Store>(
    store: &S,
    user: &User,
    hospital_id: Option<Uuid>,
    policy: &Policy,
) -> Result<Membership, AppError> {
    let hospital_id = hospital_id.ok_or(AppError::Forbidden(policy.message))?;

    let membership = store
        .find_active_membership(user.id, hospital_id)
        .await?
        .ok_or(AppError::Forbidden(policy.message))?;

    if !policy.required.contains(&membership.role) {
        return Err(AppError::Forbidden(policy.message));
    }

    Ok(membership)
}

/// Platform-level privilege: a superadmin flag on the user, not a
/// membership.
pub fn require_superadmin(user: &User) -> Result<(), AppError> {
    if user.is_superadmin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You must be a platform administrator to perform this action.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_cover_expected_roles() {
        assert!(HOSPITAL_MEMBER.required.contains(&Role::Nurse));
        assert!(!HOSPITAL_ADMIN_ONLY.required.contains(&Role::Nurse));
        assert!(ADMIN_OR_MEDICAL_ADMIN.required.contains(&Role::MedicalAdmin));
        assert!(!ADMIN_OR_MEDICAL_ADMIN.required.contains(&Role::Nurse));
        assert_eq!(MEDICAL_ADMIN_ONLY.required.len(), 1);
        assert!(MEDICAL_ADMIN_ONLY.required.contains(&Role::MedicalAdmin));
    }
}
