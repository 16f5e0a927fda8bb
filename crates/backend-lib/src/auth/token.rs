// ============================
// carebridge-backend-lib/src/auth/token.rs
// ============================
//! Signed session tokens: a short-lived access token and a longer-lived
//! refresh token, both HS256 JWTs bound to the user's id.
use carebridge_common::TokenPair;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::error::AppError;

/// Which half of a token pair a claim set belongs to. Mixing the two is
/// a validation failure, not a different privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Token id; refresh jtis key the revocation record.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub typ: TokenKind,
}

/// Issues and validates token pairs.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(settings: &Settings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.token_secret.as_bytes()),
            access_ttl: Duration::seconds(settings.access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(settings.refresh_ttl_secs as i64),
        }
    }

    /// Mint a fresh access + refresh pair for a user.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.sign(user_id, TokenKind::Access, self.access_ttl)?,
            refresh: self.sign(user_id, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    fn sign(&self, user_id: Uuid, typ: TokenKind, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            typ,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify signature and expiry and require the expected token kind.
    /// Every failure collapses to `TokenInvalid`.
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AppError::TokenInvalid)?;
        if data.claims.typ != expected {
            return Err(AppError::TokenInvalid);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        let mut settings = Settings::default();
        settings.token_secret = "test-secret".to_string();
        TokenSigner::new(&settings)
    }

    #[test]
    fn issued_pair_decodes_with_matching_kind() {
        let signer = signer();
        let user_id = Uuid::new_v4();
        let pair = signer.issue_pair(user_id).unwrap();

        let access = signer.decode(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(access.sub, user_id);
        let refresh = signer.decode(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn access_token_is_not_a_refresh_token() {
        let signer = signer();
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        assert!(matches!(
            signer.decode(&pair.access, TokenKind::Refresh),
            Err(AppError::TokenInvalid)
        ));
        assert!(matches!(
            signer.decode(&pair.refresh, TokenKind::Access),
            Err(AppError::TokenInvalid)
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let signer = signer();
        assert!(matches!(
            signer.decode("not-a-jwt", TokenKind::Access),
            Err(AppError::TokenInvalid)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = signer();
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();

        let mut other_settings = Settings::default();
        other_settings.token_secret = "different-secret".to_string();
        let other = TokenSigner::new(&other_settings);
        assert!(matches!(
            other.decode(&pair.access, TokenKind::Access),
            Err(AppError::TokenInvalid)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut settings = Settings::default();
        settings.token_secret = "test-secret".to_string();
        settings.access_ttl_secs = 0;
        let signer = TokenSigner::new(&settings);
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(matches!(
            signer.decode(&pair.access, TokenKind::Access),
            Err(AppError::TokenInvalid)
        ));
    }

    #[test]
    fn access_lifetime_respects_settings() {
        let mut settings = Settings::default();
        settings.token_secret = "test-secret".to_string();
        let signer = TokenSigner::new(&settings);
        let pair = signer.issue_pair(Uuid::new_v4()).unwrap();
        let claims = signer.decode(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        let claims = signer.decode(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 604_800);
    }
}
