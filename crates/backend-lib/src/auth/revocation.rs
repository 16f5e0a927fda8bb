// ============================
// carebridge-backend-lib/src/auth/revocation.rs
// ============================
//! Durable record of revoked refresh tokens.
//!
//! Keyed by token id (`jti`) with the token's expiry as TTL; consulted
//! on every refresh-token validation. The record must survive process
//! restarts — a crash must not forget a revoked token.
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::{fs as tokio_fs, sync::RwLock};

use crate::error::AppError;

/// Trait for revocation record backends
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Mark a token id revoked until `expires_at` (unix seconds).
    /// Returns `false` if the id was already revoked — the caller that
    /// gets `true` is the single winner of a rotation race.
    async fn revoke(&self, jti: &str, expires_at: i64) -> Result<bool, AppError>;

    /// Whether a token id is currently revoked.
    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError>;
}

/// Flat-file implementation of the `RevocationStore` trait
pub struct FlatFileRevocations {
    path: PathBuf,
    entries: RwLock<HashMap<String, i64>>,
}

impl FlatFileRevocations {
    /// Open (or initialize) the record at `path`, pruning entries whose
    /// token has expired anyway.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio_fs::create_dir_all(parent).await?;
        }

        let mut entries: HashMap<String, i64> = if path.exists() {
            let content = tokio_fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        let now = Utc::now().timestamp();
        entries.retain(|_, exp| *exp > now);

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, i64>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for FlatFileRevocations {
    async fn revoke(&self, jti: &str, expires_at: i64) -> Result<bool, AppError> {
        let mut entries = self.entries.write().await;
        let now = Utc::now().timestamp();
        entries.retain(|_, exp| *exp > now);

        if entries.contains_key(jti) {
            return Ok(false);
        }
        entries.insert(jti.to_string(), expires_at);
        self.persist(&entries).await?;
        Ok(true)
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AppError> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(jti))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn revoke_is_single_winner() {
        let dir = tempdir().unwrap();
        let store = FlatFileRevocations::open(dir.path().join("revoked-tokens.json"))
            .await
            .unwrap();

        let exp = Utc::now().timestamp() + 600;
        assert!(store.revoke("jti-1", exp).await.unwrap());
        assert!(!store.revoke("jti-1", exp).await.unwrap());
        assert!(store.is_revoked("jti-1").await.unwrap());
        assert!(!store.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn record_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("revoked-tokens.json");
        let exp = Utc::now().timestamp() + 600;

        {
            let store = FlatFileRevocations::open(&path).await.unwrap();
            store.revoke("jti-persisted", exp).await.unwrap();
        }

        let reopened = FlatFileRevocations::open(&path).await.unwrap();
        assert!(reopened.is_revoked("jti-persisted").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entries_are_pruned_on_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("revoked-tokens.json");

        {
            let store = FlatFileRevocations::open(&path).await.unwrap();
            // Already past its expiry.
            store
                .revoke("jti-stale", Utc::now().timestamp() - 10)
                .await
                .unwrap();
        }

        let reopened = FlatFileRevocations::open(&path).await.unwrap();
        assert!(!reopened.is_revoked("jti-stale").await.unwrap());
    }
}
