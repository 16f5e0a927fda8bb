// ============================
// carebridge-backend-lib/src/directory.rs
// ============================
//! Tenant directory: hospitals and the invariants binding them to
//! their members.

use carebridge_common::{
    CreateHospitalRequest, HospitalStatus, MembershipSummary, UpdateHospitalRequest, UserView,
};
use chrono::Utc;
use metrics::counter;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics as keys;
use crate::model::{Hospital, Membership, User};
use crate::storage::Store;
use crate::validation;

/// Register a hospital in `Pending` status. The creator becomes its
/// founding Hospital Admin in the same store write, so a hospital can
/// never exist without an administrator.
pub async fn create_hospital<S: Store>(
    store: &S,
    req: CreateHospitalRequest,
    creator: &User,
) -> Result<(Hospital, Membership), AppError> {
    validation::validate_new_hospital(&req).map_err(AppError::Validation)?;

    let now = Utc::now();
    let hospital = Hospital {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        registration_number: validation::normalize_registration_number(&req.registration_number),
        email: validation::normalize_email(&req.email),
        phone: req.phone.trim().to_string(),
        address: req.address.trim().to_string(),
        city: req.city.trim().to_string(),
        country: req.country.trim().to_string(),
        status: HospitalStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let (hospital, membership) = store.create_hospital(hospital, creator.id).await?;
    counter!(keys::HOSPITAL_CREATED).increment(1);
    tracing::info!(hospital_id = %hospital.id, creator = %creator.id, "hospital registered");
    Ok((hospital, membership))
}

/// Overwrite a hospital's status. Platform-admin gating happens at the
/// call site; any status is reachable from any other here.
pub async fn set_status<S: Store>(
    store: &S,
    hospital_id: Uuid,
    status: HospitalStatus,
) -> Result<Hospital, AppError> {
    let hospital = store.set_hospital_status(hospital_id, status).await?;
    tracing::info!(hospital_id = %hospital.id, status = %status, "hospital status changed");
    Ok(hospital)
}

/// List hospitals. Superadmins see every status; everyone else only
/// sees active hospitals.
pub async fn list_hospitals<S: Store>(
    store: &S,
    viewer: Option<&User>,
) -> Result<Vec<Hospital>, AppError> {
    let hospitals = store.list_hospitals().await?;
    if viewer.is_some_and(|u| u.is_superadmin) {
        return Ok(hospitals);
    }
    Ok(hospitals
        .into_iter()
        .filter(|h| h.status == HospitalStatus::Active)
        .collect())
}

pub async fn get_hospital<S: Store>(store: &S, id: Uuid) -> Result<Hospital, AppError> {
    store
        .find_hospital(id)
        .await?
        .ok_or(AppError::HospitalNotFound)
}

/// Update contact details; never touches status.
pub async fn update_hospital<S: Store>(
    store: &S,
    id: Uuid,
    req: UpdateHospitalRequest,
) -> Result<Hospital, AppError> {
    if let Some(email) = &req.email {
        if let Some(msg) = validation::check_email(email.trim()) {
            return Err(AppError::field("email", &msg));
        }
    }
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::field("name", "Hospital name is required."));
        }
    }
    store.update_hospital(id, req).await
}

/// The hospitals where `user` currently holds an active membership.
pub async fn my_hospitals<S: Store>(store: &S, user: &User) -> Result<Vec<Hospital>, AppError> {
    let memberships = store.memberships_for_user(user.id).await?;
    let mut hospitals = Vec::new();
    for membership in memberships.iter().filter(|m| m.is_active) {
        if let Some(hospital) = store.find_hospital(membership.hospital_id).await? {
            hospitals.push(hospital);
        }
    }
    hospitals.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(hospitals)
}

/// Build the full profile view of a user: identity plus their active
/// memberships with the hospital joined in.
pub async fn user_profile<S: Store>(store: &S, user: &User) -> Result<UserView, AppError> {
    let memberships = store.memberships_for_user(user.id).await?;
    let mut summaries = Vec::new();
    for membership in memberships.iter().filter(|m| m.is_active) {
        if let Some(hospital) = store.find_hospital(membership.hospital_id).await? {
            summaries.push(MembershipSummary {
                hospital_id: hospital.id,
                hospital_name: hospital.name,
                hospital_status: hospital.status,
                role: membership.role,
                is_active: membership.is_active,
            });
        }
    }

    Ok(UserView {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.full_name(),
        phone: user.phone.clone(),
        date_joined: user.date_joined,
        memberships: summaries,
    })
}
