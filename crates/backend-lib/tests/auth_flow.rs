// crates/backend-lib/tests/auth_flow.rs
//! Credential and session flows: registration, login, token rotation
//! and revocation.

use std::sync::Arc;
use tempfile::TempDir;

use carebridge_backend_lib::auth::{
    hash_password, AuthService, DefaultAuth, FlatFileRevocations, TokenSigner,
};
use carebridge_backend_lib::config::Settings;
use carebridge_backend_lib::error::AppError;
use carebridge_backend_lib::model::User;
use carebridge_backend_lib::storage::{FlatFileStore, Store};
use carebridge_common::RegisterRequest;

fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.token_secret = "test-secret".to_string();
    settings
}

async fn open_auth(dir: &TempDir) -> (Arc<FlatFileStore>, DefaultAuth<FlatFileStore>) {
    let store = Arc::new(FlatFileStore::open(dir.path()).await.unwrap());
    let revocations = Arc::new(
        FlatFileRevocations::open(dir.path().join("revoked-tokens.json"))
            .await
            .unwrap(),
    );
    let settings = test_settings();
    let auth = DefaultAuth::new(store.clone(), revocations, TokenSigner::new(&settings));
    (store, auth)
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: String::new(),
        password: "password123".to_string(),
        password_confirm: "password123".to_string(),
    }
}

#[tokio::test]
async fn register_lowercases_email() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    let (user, tokens) = auth.register(register_request("Ada@X.COM")).await.unwrap();
    assert_eq!(user.email, "ada@x.com");
    assert!(!tokens.access.is_empty());
    assert!(!tokens.refresh.is_empty());
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    auth.register(register_request("ada@x.com")).await.unwrap();
    let err = auth
        .register(register_request("ADA@x.com"))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(fields) => assert!(fields.contains_key("email")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_does_not_reveal_which_credential_was_wrong() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    auth.register(register_request("ada@x.com")).await.unwrap();

    let unknown_email = auth.login("nobody@x.com", "password123").await.unwrap_err();
    let wrong_password = auth.login("ada@x.com", "wrong-password").await.unwrap_err();
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert!(matches!(wrong_password, AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_rejects_disabled_account() {
    let dir = TempDir::new().unwrap();
    let (store, auth) = open_auth(&dir).await;

    let hash = hash_password("password123").unwrap();
    let mut user = User::new(
        "sleepy@x.com".to_string(),
        "Dormant".to_string(),
        "Account".to_string(),
        String::new(),
        hash,
    );
    user.is_active = false;
    store.insert_user(user).await.unwrap();

    let err = auth.login("sleepy@x.com", "password123").await.unwrap_err();
    assert!(matches!(err, AppError::AccountDisabled));
}

#[tokio::test]
async fn login_is_case_insensitive_on_email() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    auth.register(register_request("ada@x.com")).await.unwrap();
    let (user, _tokens) = auth.login("ADA@X.COM", "password123").await.unwrap();
    assert_eq!(user.email, "ada@x.com");
}

#[tokio::test]
async fn rotation_invalidates_the_presented_refresh_token() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    let (_user, first) = auth.register(register_request("ada@x.com")).await.unwrap();

    let second = auth.rotate(&first.refresh).await.unwrap();

    // Replaying the rotated-away token must fail.
    let replay = auth.rotate(&first.refresh).await.unwrap_err();
    assert!(matches!(replay, AppError::TokenInvalid));

    // The freshly issued refresh token still works.
    auth.rotate(&second.refresh).await.unwrap();
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    let (_user, tokens) = auth.register(register_request("ada@x.com")).await.unwrap();
    let err = auth.rotate(&tokens.access).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
}

#[tokio::test]
async fn revoke_is_not_idempotent() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    let (_user, tokens) = auth.register(register_request("ada@x.com")).await.unwrap();

    auth.revoke(&tokens.refresh).await.unwrap();
    let err = auth.revoke(&tokens.refresh).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));

    // A revoked token can no longer be rotated either.
    let err = auth.rotate(&tokens.refresh).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
}

#[tokio::test]
async fn revocation_survives_a_restart() {
    let dir = TempDir::new().unwrap();

    let tokens = {
        let (_store, auth) = open_auth(&dir).await;
        let (_user, tokens) = auth.register(register_request("ada@x.com")).await.unwrap();
        auth.revoke(&tokens.refresh).await.unwrap();
        tokens
    };

    // Re-open everything from disk; the revocation must still hold.
    let (_store, auth) = open_auth(&dir).await;
    let err = auth.rotate(&tokens.refresh).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
}

#[tokio::test]
async fn authenticate_resolves_access_token_to_user() {
    let dir = TempDir::new().unwrap();
    let (_store, auth) = open_auth(&dir).await;

    let (user, tokens) = auth.register(register_request("ada@x.com")).await.unwrap();
    let resolved = auth.authenticate(&tokens.access).await.unwrap();
    assert_eq!(resolved.id, user.id);

    let err = auth.authenticate("garbage").await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));

    // Refresh tokens are not bearer credentials.
    let err = auth.authenticate(&tokens.refresh).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
}
