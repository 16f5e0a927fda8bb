// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration, login, logout, token refresh and the current-user
//! profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use carebridge_common::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use std::sync::Arc;

use crate::directory;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::storage::Store;
use crate::AppState;

pub async fn register<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, tokens) = state.auth.register(req).await?;
    let user = directory::user_profile(state.store.as_ref(), &user).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, tokens })))
}

pub async fn login<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, tokens) = state.auth.login(&req.email, &req.password).await?;
    let user = directory::user_profile(state.store.as_ref(), &user).await?;
    Ok(Json(AuthResponse { user, tokens }))
}

pub async fn logout<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let refresh = req.refresh.ok_or(AppError::MissingRefreshToken)?;
    state.auth.revoke(&refresh).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn refresh_token<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let refresh = req.refresh.ok_or(AppError::MissingRefreshToken)?;
    let tokens = state.auth.rotate(&refresh).await?;
    Ok(Json(tokens))
}

pub async fn me<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let profile = directory::user_profile(state.store.as_ref(), &user).await?;
    Ok(Json(profile))
}
