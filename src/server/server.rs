use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub token_service: Arc<dyn TokenService>,
    pub developer_enabled: bool,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub fn new(token_service: Arc<dyn TokenService>, developer_enabled: bool) -> Self {
        Self {
            token_service,
            developer_enabled,
            pool: None,
        }
    }

    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        if settings.auth.access_secret.is_empty() || settings.auth.refresh_secret.is_empty() {
            return Err(anyhow::anyhow!("auth secrets must not be empty"));
        }
        if settings.auth.access_secret == settings.auth.refresh_secret {
            warn!("access and refresh tokens share one signing secret");
        }
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(
            JwtConfig {
                access_secret: settings.auth.access_secret.clone().into_bytes(),
                refresh_secret: settings.auth.refresh_secret.clone().into_bytes(),
                access_ttl: Duration::from_secs(settings.auth.access_ttl_secs),
                refresh_ttl: Duration::from_secs(settings.auth.refresh_ttl_secs),
            },
            clock.clone(),
        ));

        let token_store: Arc<dyn RefreshTokenStore> =
            match settings.token_store.backend.as_str() {
                "memory" => Arc::new(MemoryRefreshTokenStore::new(clock.clone())),
                "redis" => Arc::new(
                    RedisRefreshTokenStore::connect(
                        &settings.token_store.redis_dsn,
                        settings.token_store.prefix.clone(),
                    )
                    .await?,
                ),
                other => return Err(anyhow::anyhow!("Unknown token store backend: {}", other)),
            };

        let mut pool = None;
        let user_directory: Arc<dyn UserDirectory> = match settings.user.backend.as_str() {
            "memory" => {
                let directory = MemoryUserDirectory::new();
                for seed in &settings.user.seed {
                    let id = seed
                        .id
                        .parse::<UserId>()
                        .map_err(|e| anyhow::anyhow!("seed user id {:?}: {}", seed.id, e))?;
                    directory.insert(Identity {
                        id,
                        mobile: Mobile(seed.mobile.clone()),
                    });
                }
                debug!(count = settings.user.seed.len(), "memory user directory seeded");
                Arc::new(directory)
            }
            "mysql" => {
                let mysql = Pool::<MySql>::connect(&settings.user.mysql_dsn).await?;
                pool = Some(mysql.clone());
                Arc::new(MySqlUserDirectory::new(mysql))
            }
            other => return Err(anyhow::anyhow!("Unknown user backend: {}", other)),
        };

        let token_service: Arc<dyn TokenService> = Arc::new(RealTokenService::new(
            user_directory,
            token_store,
            token_codec,
            clock,
        ));

        if settings.developer.enabled {
            warn!("developer routes are enabled");
        }
        info!("server started");

        Ok(Self {
            token_service,
            developer_enabled: settings.developer.enabled,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("mysql pool closed");
        }
    }
}
