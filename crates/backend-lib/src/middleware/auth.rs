// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::model::User;
use crate::storage::Store;
use crate::AppState;

/// The authenticated caller, stashed in request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract and verify the `Authorization: Bearer` access token, resolve
/// it to an active user and make it available to handlers.
pub async fn require_auth<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let user = state.auth.authenticate(token).await?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
