/// Walks the refresh-token rotation on in-memory backends:
/// two logins for one user, then a check that only the second refresh token
/// is still honored.
///
/// $ cargo run --bin session_demo
use chrono::Utc;
use coursehub::application_impl::{JwtConfig, JwtHs256Codec, RealTokenService};
use coursehub::application_port::{TokenCodec, TokenService};
use coursehub::domain_model::{Clock, Identity, ManualClock, Mobile, UserId};
use coursehub::domain_port::{RefreshTokenStore, UserDirectory};
use coursehub::infra_memory::{MemoryRefreshTokenStore, MemoryUserDirectory};
use coursehub::logger::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.set_filter("session_demo=debug,coursehub=debug")?;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let dyn_clock: Arc<dyn Clock> = clock.clone();

    let directory = MemoryUserDirectory::new();
    let user = Identity {
        id: UserId::new(),
        mobile: Mobile::from("09120000000"),
    };
    directory.insert(user.clone());
    let directory: Arc<dyn UserDirectory> = Arc::new(directory);

    let store: Arc<dyn RefreshTokenStore> =
        Arc::new(MemoryRefreshTokenStore::new(dyn_clock.clone()));
    let codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(
        JwtConfig {
            access_secret: b"demo-access-secret".to_vec(),
            refresh_secret: b"demo-refresh-secret".to_vec(),
            access_ttl: Duration::from_secs(60 * 60),
            refresh_ttl: Duration::from_secs(365 * 24 * 60 * 60),
        },
        dyn_clock.clone(),
    ));
    let token_service: Arc<dyn TokenService> =
        Arc::new(RealTokenService::new(directory, store, codec, dyn_clock));

    let first = token_service.issue_session(user.id).await?;
    let second = token_service.issue_session(user.id).await?;

    match token_service
        .verify_refresh_token(&first.refresh_token.0)
        .await
    {
        Ok(mobile) => warn!(%mobile, "first refresh token unexpectedly accepted"),
        Err(e) => info!("first refresh token rejected: {}", e),
    }
    let mobile = token_service
        .verify_refresh_token(&second.refresh_token.0)
        .await?;
    info!(%mobile, "second refresh token accepted");

    clock.advance(chrono::Duration::hours(1));
    match token_service
        .verify_access_token(&second.access_token.0)
        .await
    {
        Ok(identity) => warn!(?identity, "access token outlived its hour"),
        Err(e) => info!("access token expired after an hour: {}", e),
    }

    let renewed = token_service
        .renew_session(&second.refresh_token.0)
        .await?;
    info!(expires_at = %renewed.access_token_expires_at, "session renewed");

    Ok(())
}
