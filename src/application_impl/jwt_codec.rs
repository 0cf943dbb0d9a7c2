use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    mobile: String,
    iat: i64,
    exp: i64,
    // keeps two tokens minted in the same second distinct
    jti: String,
}

fn sign(
    mobile: &Mobile,
    secret: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let iat = now.timestamp();
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| iat.checked_add(secs))
        .ok_or_else(|| AuthError::InternalError(format!("token ttl out of range: {ttl:?}")))?;
    let claims = Claims {
        mobile: mobile.0.clone(),
        iat,
        exp,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::InternalError(format!("sign token: {e}")))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::InternalError("token expiry out of range".to_string()))?;
    Ok((token, expires_at))
}

fn verify(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
    // expiry is checked below against the injected clock, with no leeway
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = false;
    v.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &v)
        .map_err(|e| {
            debug!(kind = ?e.kind(), "token rejected");
            AuthError::reauthenticate()
        })?
        .claims;

    if now.timestamp() >= claims.exp {
        debug!("token expired");
        return Err(AuthError::reauthenticate());
    }

    let expires_at =
        DateTime::from_timestamp(claims.exp, 0).ok_or_else(AuthError::reauthenticate)?;
    Ok(TokenClaims {
        mobile: Mobile(claims.mobile),
        expires_at,
    })
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        JwtHs256Codec { cfg, clock }
    }
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn sign_access(&self, mobile: &Mobile) -> Result<Issued<AccessToken>, AuthError> {
        let (token, expires_at) = sign(
            mobile,
            &self.cfg.access_secret,
            self.cfg.access_ttl,
            self.clock.now(),
        )?;
        Ok(Issued {
            token: AccessToken(token),
            expires_at,
        })
    }

    async fn sign_refresh(&self, mobile: &Mobile) -> Result<Issued<RefreshToken>, AuthError> {
        let (token, expires_at) = sign(
            mobile,
            &self.cfg.refresh_secret,
            self.cfg.refresh_ttl,
            self.clock.now(),
        )?;
        Ok(Issued {
            token: RefreshToken(token),
            expires_at,
        })
    }

    async fn verify_access(&self, token: &AccessToken) -> Result<TokenClaims, AuthError> {
        verify(&token.0, &self.cfg.access_secret, self.clock.now())
    }

    async fn verify_refresh(&self, token: &RefreshToken) -> Result<TokenClaims, AuthError> {
        verify(&token.0, &self.cfg.refresh_secret, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: b"access-secret-for-tests".to_vec(),
            refresh_secret: b"refresh-secret-for-tests".to_vec(),
            access_ttl: Duration::from_secs(60 * 60),
            refresh_ttl: Duration::from_secs(365 * 24 * 60 * 60),
        }
    }

    fn codec() -> (JwtHs256Codec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (JwtHs256Codec::new(test_config(), clock.clone()), clock)
    }

    #[tokio::test]
    async fn access_token_carries_mobile() {
        let (codec, clock) = codec();
        let mobile = Mobile::from("09120000000");

        let issued = codec.sign_access(&mobile).await.unwrap();
        let claims = codec.verify_access(&issued.token).await.unwrap();

        assert_eq!(claims.mobile, mobile);
        assert_eq!(claims.expires_at, issued.expires_at);
        assert_eq!(
            claims.expires_at.timestamp() - clock.now().timestamp(),
            3600
        );
    }

    #[tokio::test]
    async fn access_token_expires_after_one_hour() {
        let (codec, clock) = codec();
        let issued = codec.sign_access(&Mobile::from("09120000000")).await.unwrap();

        clock.advance(chrono::Duration::minutes(59));
        assert!(codec.verify_access(&issued.token).await.is_ok());

        clock.advance(chrono::Duration::minutes(1));
        assert_matches!(
            codec.verify_access(&issued.token).await,
            Err(AuthError::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn refresh_token_lives_for_a_year() {
        let (codec, clock) = codec();
        let issued = codec.sign_refresh(&Mobile::from("09120000000")).await.unwrap();

        clock.advance(chrono::Duration::days(364));
        assert!(codec.verify_refresh(&issued.token).await.is_ok());

        clock.advance(chrono::Duration::days(1));
        assert_matches!(
            codec.verify_refresh(&issued.token).await,
            Err(AuthError::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn keys_are_not_interchangeable() {
        let (codec, _) = codec();
        let mobile = Mobile::from("09120000000");

        let access = codec.sign_access(&mobile).await.unwrap();
        let refresh = codec.sign_refresh(&mobile).await.unwrap();

        assert_matches!(
            codec.verify_refresh(&RefreshToken(access.token.0)).await,
            Err(AuthError::Unauthorized(_))
        );
        assert_matches!(
            codec.verify_access(&AccessToken(refresh.token.0)).await,
            Err(AuthError::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn tokens_minted_back_to_back_differ() {
        let (codec, _) = codec();
        let mobile = Mobile::from("09120000000");

        let first = codec.sign_refresh(&mobile).await.unwrap();
        let second = codec.sign_refresh(&mobile).await.unwrap();

        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn oversized_ttl_is_an_internal_error() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mobile = Mobile::from("09120000000");

        for secs in [u64::MAX, i64::MAX as u64] {
            let cfg = JwtConfig {
                refresh_ttl: Duration::from_secs(secs),
                ..test_config()
            };
            let codec = JwtHs256Codec::new(cfg, clock.clone());
            assert_matches!(
                codec.sign_refresh(&mobile).await,
                Err(AuthError::InternalError(_))
            );
        }
    }

    #[tokio::test]
    async fn garbage_is_unauthorized() {
        let (codec, _) = codec();

        for raw in [
            "",
            "garbage",
            "a.b.c",
            // alg "none", claims {"mobile":"09120000000","iat":0,"exp":9999999999,"jti":"x"}
            "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJtb2JpbGUiOiIwOTEyMDAwMDAwMCIsImlhdCI6MCwiZXhwIjo5OTk5OTk5OTk5LCJqdGkiOiJ4In0.",
        ] {
            assert_matches!(
                codec.verify_refresh(&RefreshToken(raw.to_string())).await,
                Err(AuthError::Unauthorized(_)),
                "{raw:?} should be rejected"
            );
        }
    }
}
