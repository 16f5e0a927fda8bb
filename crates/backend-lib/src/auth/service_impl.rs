// ============================
// carebridge-backend-lib/src/auth/service_impl.rs
// ============================
use async_trait::async_trait;
use carebridge_common::{RegisterRequest, TokenPair};
use metrics::counter;
use std::sync::Arc;

use crate::auth::password::{hash_password_secure, verify_password};
use crate::auth::token::{TokenKind, TokenSigner};
use crate::auth::{AuthService, RevocationStore};
use crate::error::AppError;
use crate::metrics as keys;
use crate::model::User;
use crate::storage::Store;
use crate::validation;

pub struct DefaultAuth<S> {
    store: Arc<S>,
    revocations: Arc<dyn RevocationStore>,
    signer: TokenSigner,
}

impl<S: Store> DefaultAuth<S> {
    pub fn new(store: Arc<S>, revocations: Arc<dyn RevocationStore>, signer: TokenSigner) -> Self {
        Self {
            store,
            revocations,
            signer,
        }
    }
}

#[async_trait]
impl<S: Store> AuthService for DefaultAuth<S> {
    async fn register(&self, req: RegisterRequest) -> Result<(User, TokenPair), AppError> {
        validation::validate_registration(&req).map_err(AppError::Validation)?;

        let mut password = req.password;
        let password_hash =
            hash_password_secure(&mut password).map_err(|e| AppError::Internal(e.to_string()))?;

        let user = User::new(
            validation::normalize_email(&req.email),
            req.first_name.trim().to_string(),
            req.last_name.trim().to_string(),
            req.phone.trim().to_string(),
            password_hash,
        );

        // The store re-checks email uniqueness under its write lock, so
        // a concurrent duplicate registration loses there.
        let user = self.store.insert_user(user).await?;
        let tokens = self.signer.issue_pair(user.id)?;

        counter!(keys::AUTH_REGISTERED).increment(1);
        tracing::info!(user_id = %user.id, "user registered");
        Ok((user, tokens))
    }

    async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let user = self
            .store
            .find_user_by_email(&validation::normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, password) {
            counter!(keys::AUTH_LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            counter!(keys::AUTH_LOGIN_FAILED).increment(1);
            return Err(AppError::AccountDisabled);
        }

        let tokens = self.signer.issue_pair(user.id)?;
        counter!(keys::AUTH_LOGIN).increment(1);
        tracing::debug!(user_id = %user.id, "login succeeded");
        Ok((user, tokens))
    }

    async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.signer.decode(refresh_token, TokenKind::Refresh)?;

        // revoke() admits exactly one caller per jti, so concurrent
        // rotations of the same token cannot both succeed.
        if !self.revocations.revoke(&claims.jti, claims.exp).await? {
            return Err(AppError::TokenInvalid);
        }

        let pair = self.signer.issue_pair(claims.sub)?;
        counter!(keys::TOKEN_ROTATED).increment(1);
        Ok(pair)
    }

    async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let claims = self.signer.decode(refresh_token, TokenKind::Refresh)?;

        // Revoking an already-revoked token is an error, not a no-op.
        if !self.revocations.revoke(&claims.jti, claims.exp).await? {
            return Err(AppError::TokenInvalid);
        }

        counter!(keys::TOKEN_REVOKED).increment(1);
        tracing::debug!(user_id = %claims.sub, "refresh token revoked");
        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> Result<User, AppError> {
        let claims = self.signer.decode(access_token, TokenKind::Access)?;
        let user = self
            .store
            .find_user(claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        Ok(user)
    }
}
