// ============================
// crates/backend-lib/src/handlers/hospitals.rs
// ============================
//! Hospital registration, listing, detail, update and status change.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use carebridge_common::{CreateHospitalRequest, SetStatusRequest, UpdateHospitalRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::authz;
use crate::directory;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::storage::Store;
use crate::AppState;

/// Listing is public: active hospitals only for anonymous and regular
/// callers, every status for a superadmin presenting a bearer token.
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let viewer = match headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => state.auth.authenticate(token).await.ok(),
        None => None,
    };
    let hospitals = directory::list_hospitals(state.store.as_ref(), viewer.as_ref()).await?;
    Ok(Json(
        hospitals.iter().map(|h| h.view()).collect::<Vec<_>>(),
    ))
}

pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateHospitalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (hospital, _membership) = directory::create_hospital(state.store.as_ref(), req, &user).await?;
    Ok((StatusCode::CREATED, Json(hospital.view())))
}

pub async fn mine<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let hospitals = directory::my_hospitals(state.store.as_ref(), &user).await?;
    Ok(Json(
        hospitals.iter().map(|h| h.view()).collect::<Vec<_>>(),
    ))
}

pub async fn detail<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(hospital_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let hospital = directory::get_hospital(state.store.as_ref(), hospital_id).await?;
    Ok(Json(hospital.view()))
}

pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(hospital_id): Path<Uuid>,
    Json(req): Json<UpdateHospitalRequest>,
) -> Result<impl IntoResponse, AppError> {
    authz::authorize(
        state.store.as_ref(),
        &user,
        Some(hospital_id),
        &authz::HOSPITAL_ADMIN_ONLY,
    )
    .await?;
    let hospital = directory::update_hospital(state.store.as_ref(), hospital_id, req).await?;
    Ok(Json(hospital.view()))
}

/// Superadmin-only status overwrite.
pub async fn set_status<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(hospital_id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    authz::require_superadmin(&user)?;
    let hospital = directory::set_status(state.store.as_ref(), hospital_id, req.status).await?;
    Ok(Json(hospital.view()))
}
