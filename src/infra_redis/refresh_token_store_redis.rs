use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

pub struct RedisRefreshTokenStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRefreshTokenStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRefreshTokenStore {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Opens a managed connection and checks it with a `PING`.
    pub async fn connect(dsn: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let client = redis::Client::open(dsn)?;
        let mut conn = client.get_connection_manager().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(%pong, "redis token store connected");
        Ok(Self::new(conn, prefix))
    }

    fn key(&self, user_id: UserId) -> String {
        format!("{}:{}", self.prefix, user_id)
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn set_with_expiry(
        &self,
        user_id: UserId,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&key, token, ttl_secs)
            .await
            .map_err(|e| AuthError::InternalError(format!("store refresh token: {e}")))?;
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::InternalError(format!("read refresh token: {e}")))?;
        Ok(val)
    }
}
