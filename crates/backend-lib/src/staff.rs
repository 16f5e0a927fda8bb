// ============================
// carebridge-backend-lib/src/staff.rs
// ============================
//! Staff lifecycle: adding, reactivating, updating and removing
//! hospital memberships.
//!
//! The store's compound operations are the authoritative guard for the
//! (user, hospital) uniqueness and the system-wide nurse invariant;
//! the checks here are the fast path that produces friendly errors.

use carebridge_common::{AddStaffRequest, MembershipView, UpdateStaffRequest};
use metrics::counter;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics as keys;
use crate::model::User;
use crate::storage::Store;
use crate::validation;

/// All memberships of a hospital — active and inactive — with the
/// member's identity joined in.
pub async fn list_staff<S: Store>(
    store: &S,
    hospital_id: Uuid,
) -> Result<Vec<MembershipView>, AppError> {
    let memberships = store.list_staff(hospital_id).await?;
    let mut views = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        let user = store
            .find_user(membership.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        views.push(membership.view(&user));
    }
    Ok(views)
}

/// Add an existing user to a hospital with a role.
///
/// The target must already hold an account — there is no implicit
/// account creation. A previously removed member is reactivated under
/// their original membership row.
pub async fn add_staff<S: Store>(
    store: &S,
    hospital_id: Uuid,
    req: AddStaffRequest,
    invited_by: &User,
) -> Result<MembershipView, AppError> {
    let email = validation::normalize_email(&req.email);
    if let Some(msg) = validation::check_email(&email) {
        return Err(AppError::field("email", &msg));
    }

    store
        .find_hospital(hospital_id)
        .await?
        .ok_or(AppError::HospitalNotFound)?;
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let membership = store
        .add_staff(hospital_id, user.id, req.role, invited_by.id)
        .await?;

    counter!(keys::STAFF_ADDED).increment(1);
    tracing::info!(
        hospital_id = %hospital_id,
        user_id = %user.id,
        role = %membership.role,
        "staff member added"
    );
    Ok(membership.view(&user))
}

/// Change a staff member's role and/or active flag.
pub async fn update_staff<S: Store>(
    store: &S,
    hospital_id: Uuid,
    membership_id: Uuid,
    req: UpdateStaffRequest,
) -> Result<MembershipView, AppError> {
    let membership = store
        .update_membership(hospital_id, membership_id, req.role, req.active)
        .await?;
    let user = store
        .find_user(membership.user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(membership.view(&user))
}

/// Soft removal: the membership row is deactivated, never deleted, so
/// the audit history and invited-by chain survive.
pub async fn remove_staff<S: Store>(
    store: &S,
    hospital_id: Uuid,
    membership_id: Uuid,
) -> Result<(), AppError> {
    let membership = store
        .deactivate_membership(hospital_id, membership_id)
        .await?;
    counter!(keys::STAFF_REMOVED).increment(1);
    tracing::info!(
        hospital_id = %hospital_id,
        membership_id = %membership.id,
        "staff member removed"
    );
    Ok(())
}
