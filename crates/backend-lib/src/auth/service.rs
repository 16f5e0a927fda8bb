// ============================
// carebridge-backend-lib/src/auth/service.rs
// ============================
use async_trait::async_trait;
use carebridge_common::{RegisterRequest, TokenPair};

use crate::error::AppError;
use crate::model::User;

/// Credential and session operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and immediately issue a token pair.
    async fn register(&self, req: RegisterRequest) -> Result<(User, TokenPair), AppError>;

    /// Verify email + password and issue a token pair.
    async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError>;

    /// Exchange a refresh token for a fresh pair, revoking the one
    /// presented (rotation-on-use).
    async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, AppError>;

    /// Permanently invalidate a refresh token. Not idempotent: revoking
    /// an already-revoked token is an error.
    async fn revoke(&self, refresh_token: &str) -> Result<(), AppError>;

    /// Resolve a bearer access token to its active user.
    async fn authenticate(&self, access_token: &str) -> Result<User, AppError>;
}
