use crate::domain_model::{Identity, Mobile, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Every failed refresh or access check looks the same to the caller.
    pub fn reauthenticate() -> Self {
        AuthError::Unauthorized("must re-authenticate".to_string())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct Issued<T> {
    pub token: T,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub mobile: Mobile,
    pub expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn sign_access(&self, mobile: &Mobile) -> Result<Issued<AccessToken>, AuthError>;
    async fn sign_refresh(&self, mobile: &Mobile) -> Result<Issued<RefreshToken>, AuthError>;
    async fn verify_access(&self, token: &AccessToken) -> Result<TokenClaims, AuthError>;
    async fn verify_refresh(&self, token: &RefreshToken) -> Result<TokenClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Stateless one-hour credential for the user's mobile.
    async fn issue_access_token(&self, user_id: UserId) -> Result<Issued<AccessToken>, AuthError>;

    /// Long-lived credential. Storing it replaces the user's previous refresh
    /// token, so only the most recent one can ever verify.
    async fn issue_refresh_token(&self, user_id: UserId)
    -> Result<Issued<RefreshToken>, AuthError>;

    /// Returns the mobile the token was issued for, provided the token is
    /// still the one held in the store for that user.
    async fn verify_refresh_token(&self, token: &str) -> Result<Mobile, AuthError>;

    async fn verify_access_token(&self, token: &str) -> Result<Identity, AuthError>;

    /// Access and refresh token pair for a freshly authenticated user.
    async fn issue_session(&self, user_id: UserId) -> Result<SessionTokens, AuthError>;

    /// Exchanges a valid refresh token for a new pair, superseding it.
    async fn renew_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthError>;

    /// Resolves an id received from outside the process.
    /// Malformed ids are `BadRequest`, unknown ones `NotFound`.
    async fn resolve_identity(&self, raw_id: &str) -> Result<Identity, AuthError>;
}
