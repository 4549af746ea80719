use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    auth::{
        password,
        token::{IssuedToken, TokenManager},
    },
    error::{AppError, AppResult},
    metrics::Metrics,
    models::user::{CreateUser, LoginPayload, NewUser, User, UserId},
    store::CredentialStore,
    validation,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenManager,
    metrics: Metrics,
}

/// Emails are compared exactly as stored. Only surrounding whitespace is
/// dropped, identically on write and on lookup.
fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenManager, metrics: Metrics) -> Self {
        password::prepare_dummy();
        Self {
            store,
            tokens,
            metrics,
        }
    }

    pub async fn register(&self, payload: CreateUser) -> AppResult<User> {
        let email = normalize_email(&payload.email);
        validation::email(&email)?;
        validation::password(&payload.password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let plaintext = payload.password;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash(&plaintext)).await??;

        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        self.metrics.user_op("register");
        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Unknown email and wrong password both end in
    /// [`AppError::InvalidCredentials`], after the same amount of hashing.
    pub async fn login(&self, payload: LoginPayload) -> AppResult<IssuedToken> {
        let email = normalize_email(&payload.email);
        let user = self.store.find_user_by_email(&email).await?;
        let plaintext = payload.password;

        let user = match user {
            Some(user) => {
                let stored = user.password_hash.clone();
                let ok =
                    tokio::task::spawn_blocking(move || password::verify(&plaintext, &stored))
                        .await??;
                ok.then_some(user)
            }
            None => {
                tokio::task::spawn_blocking(move || password::verify_dummy(&plaintext)).await?;
                None
            }
        };

        let Some(user) = user else {
            self.metrics.user_op("login_failed");
            tracing::info!("login rejected");
            return Err(AppError::InvalidCredentials);
        };

        self.metrics.user_op("login");
        tracing::info!(user_id = %user.id, "login succeeded");
        self.issue_session(user.id)
    }

    pub fn issue_session(&self, user_id: UserId) -> AppResult<IssuedToken> {
        self.tokens.issue(user_id, Utc::now())
    }

    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> AppResult<UserId> {
        self.tokens.validate(token, now)
    }

    /// A token can outlive its user; that case reads as not found.
    pub async fn current_user(&self, requester: UserId) -> AppResult<User> {
        self.store
            .find_user_by_id(requester)
            .await?
            .ok_or(AppError::AccessDenied)
    }
}
