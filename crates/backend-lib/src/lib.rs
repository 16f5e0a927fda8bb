// ============================
// carebridge-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `CareBridge`
//! healthcare-coordination platform: tenant membership, role-based
//! authorization, and credential/session handling.

pub mod auth;
pub mod authz;
pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod router;
pub mod staff;
pub mod storage;
pub mod validation;

use dashmap::DashMap;
use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, RevocationStore, TokenSigner};
use crate::config::Settings;
use crate::error::AppError;
use crate::middleware::rate_limit::RateLimitEntry;
use crate::storage::Store;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Directory storage backend
    pub store: Arc<S>,
    /// Credential & session service
    pub auth: Arc<dyn AuthService>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Per-client rate limit windows
    pub rate_limits: Arc<DashMap<String, RateLimitEntry>>,
}

impl<S: Store> AppState<S> {
    /// Create a new application state
    pub fn new(
        store: S,
        revocations: Arc<dyn RevocationStore>,
        settings: Settings,
    ) -> Result<Self, AppError> {
        let store = Arc::new(store);
        let signer = TokenSigner::new(&settings);
        let auth = Arc::new(DefaultAuth::new(store.clone(), revocations, signer));

        Ok(Self {
            store,
            auth,
            settings: Arc::new(settings),
            rate_limits: Arc::new(DashMap::new()),
        })
    }
}
