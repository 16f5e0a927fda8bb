// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP route table.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, hospitals, staff};
use crate::middleware::{rate_limit, require_auth};
use crate::storage::Store;
use crate::AppState;

/// Build the application router.
pub fn create_router<S: Store>(state: Arc<AppState<S>>) -> Router {
    // Credential endpoints sit behind the per-client rate limiter.
    let credentials = Router::new()
        .route("/api/auth/register", post(auth::register::<S>))
        .route("/api/auth/login", post(auth::login::<S>))
        .route("/api/auth/token/refresh", post(auth::refresh_token::<S>))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::<S>));

    let public = Router::new()
        .route("/api/hospitals", get(hospitals::list::<S>))
        .merge(credentials);

    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout::<S>))
        .route("/api/auth/me", get(auth::me::<S>))
        .route("/api/hospitals", post(hospitals::create::<S>))
        .route("/api/hospitals/mine", get(hospitals::mine::<S>))
        .route(
            "/api/hospitals/{hospital_id}",
            get(hospitals::detail::<S>).patch(hospitals::update::<S>),
        )
        .route(
            "/api/hospitals/{hospital_id}/status",
            patch(hospitals::set_status::<S>),
        )
        .route(
            "/api/hospitals/{hospital_id}/staff",
            get(staff::list::<S>).post(staff::add::<S>),
        )
        .route(
            "/api/hospitals/{hospital_id}/staff/{membership_id}",
            patch(staff::update::<S>).delete(staff::remove::<S>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
