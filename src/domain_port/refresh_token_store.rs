use crate::application_port::*;
use crate::domain_model::*;

/// Holds the single refresh token currently honored for each user.
#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Overwrites any token already stored for `user_id`.
    async fn set_with_expiry(
        &self,
        user_id: UserId,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError>;

    /// `None` when nothing was stored or the entry has expired.
    async fn get(&self, user_id: UserId) -> Result<Option<String>, AuthError>;
}
