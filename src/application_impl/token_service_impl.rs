use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RealTokenService {
    user_directory: Arc<dyn UserDirectory>,
    token_store: Arc<dyn RefreshTokenStore>,
    token_codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl RealTokenService {
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        token_store: Arc<dyn RefreshTokenStore>,
        token_codec: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_directory,
            token_store,
            token_codec,
            clock,
        }
    }

    async fn identity_by_id(&self, user_id: UserId) -> Result<Identity, AuthError> {
        self.user_directory
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("user {user_id}")))
    }

    async fn identity_by_mobile(&self, mobile: &Mobile) -> Result<Identity, AuthError> {
        match self.user_directory.find_by_mobile(mobile).await? {
            Some(identity) => Ok(identity),
            None => {
                debug!(%mobile, "token names an unknown mobile");
                Err(AuthError::reauthenticate())
            }
        }
    }

    async fn store_refresh_token(
        &self,
        identity: &Identity,
    ) -> Result<Issued<RefreshToken>, AuthError> {
        let issued = self.token_codec.sign_refresh(&identity.mobile).await?;

        let ttl_secs = self.ttl_secs(issued.expires_at);
        self.token_store
            .set_with_expiry(identity.id, &issued.token.0, ttl_secs)
            .await?;
        debug!(user_id = %identity.id, ttl_secs, "refresh token stored");

        Ok(issued)
    }

    /// Runs the refresh checks and hands back the identity the token belongs to.
    async fn verified_identity(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self
            .token_codec
            .verify_refresh(&RefreshToken(token.to_string()))
            .await?;
        let identity = self.identity_by_mobile(&claims.mobile).await?;

        let stored = self.token_store.get(identity.id).await?;
        // TODO: compare in constant time once tokens are stored hashed
        if stored.as_deref() == Some(token) {
            Ok(identity)
        } else {
            debug!(user_id = %identity.id, "refresh token superseded or expired in store");
            Err(AuthError::reauthenticate())
        }
    }

    async fn session_for(&self, identity: &Identity) -> Result<SessionTokens, AuthError> {
        let access = self.token_codec.sign_access(&identity.mobile).await?;
        let refresh = self.store_refresh_token(identity).await?;
        info!(user_id = %identity.id, "session issued");

        Ok(SessionTokens {
            access_token: access.token,
            refresh_token: refresh.token,
            access_token_expires_at: access.expires_at,
            refresh_token_expires_at: refresh.expires_at,
        })
    }

    // rounded up: the store entry must not expire before the token does
    fn ttl_secs(&self, until: DateTime<Utc>) -> u64 {
        let millis = (until - self.clock.now()).num_milliseconds();
        if millis <= 0 { 1 } else { (millis as u64).div_ceil(1000) }
    }
}

#[async_trait::async_trait]
impl TokenService for RealTokenService {
    async fn issue_access_token(&self, user_id: UserId) -> Result<Issued<AccessToken>, AuthError> {
        let identity = self.identity_by_id(user_id).await?;
        self.token_codec.sign_access(&identity.mobile).await
    }

    async fn issue_refresh_token(
        &self,
        user_id: UserId,
    ) -> Result<Issued<RefreshToken>, AuthError> {
        let identity = self.identity_by_id(user_id).await?;
        self.store_refresh_token(&identity).await
    }

    async fn verify_refresh_token(&self, token: &str) -> Result<Mobile, AuthError> {
        Ok(self.verified_identity(token).await?.mobile)
    }

    async fn verify_access_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self
            .token_codec
            .verify_access(&AccessToken(token.to_string()))
            .await?;
        self.identity_by_mobile(&claims.mobile).await
    }

    async fn issue_session(&self, user_id: UserId) -> Result<SessionTokens, AuthError> {
        let identity = self.identity_by_id(user_id).await?;
        self.session_for(&identity).await
    }

    async fn renew_session(&self, refresh_token: &str) -> Result<SessionTokens, AuthError> {
        let identity = self.verified_identity(refresh_token).await?;
        self.session_for(&identity).await
    }

    async fn resolve_identity(&self, raw_id: &str) -> Result<Identity, AuthError> {
        let user_id = raw_id
            .parse::<UserId>()
            .map_err(|_| AuthError::BadRequest(format!("malformed user id: {raw_id:?}")))?;
        self.identity_by_id(user_id).await
    }
}
