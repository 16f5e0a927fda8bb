// ============================
// crates/backend-lib/src/handlers/staff.rs
// ============================
//! Staff management endpoints. Every route requires an active
//! Hospital Admin membership in the target hospital.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use carebridge_common::{AddStaffRequest, UpdateStaffRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::authz;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::staff;
use crate::storage::Store;
use crate::AppState;

pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(hospital_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authz::authorize(
        state.store.as_ref(),
        &user,
        Some(hospital_id),
        &authz::HOSPITAL_ADMIN_ONLY,
    )
    .await?;
    let staff = staff::list_staff(state.store.as_ref(), hospital_id).await?;
    Ok(Json(staff))
}

pub async fn add<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(hospital_id): Path<Uuid>,
    Json(req): Json<AddStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    authz::authorize(
        state.store.as_ref(),
        &user,
        Some(hospital_id),
        &authz::HOSPITAL_ADMIN_ONLY,
    )
    .await?;
    let membership = staff::add_staff(state.store.as_ref(), hospital_id, req, &user).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((hospital_id, membership_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    authz::authorize(
        state.store.as_ref(),
        &user,
        Some(hospital_id),
        &authz::HOSPITAL_ADMIN_ONLY,
    )
    .await?;
    let membership =
        staff::update_staff(state.store.as_ref(), hospital_id, membership_id, req).await?;
    Ok(Json(membership))
}

pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((hospital_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    authz::authorize(
        state.store.as_ref(),
        &user,
        Some(hospital_id),
        &authz::HOSPITAL_ADMIN_ONLY,
    )
    .await?;
    staff::remove_staff(state.store.as_ref(), hospital_id, membership_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
