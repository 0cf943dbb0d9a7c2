use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

struct Entry {
    token: String,
    expire_at: DateTime<Utc>,
}

/// Process-local stand-in for the Redis store. `insert` replaces the entry
/// atomically, matching `SET EX` semantics.
pub struct MemoryRefreshTokenStore {
    entries: DashMap<UserId, Entry>,
    clock: Arc<dyn Clock>,
}

impl MemoryRefreshTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        MemoryRefreshTokenStore {
            entries: DashMap::new(),
            clock,
        }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn set_with_expiry(
        &self,
        user_id: UserId,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let ttl = i64::try_from(ttl_secs)
            .map_err(|_| AuthError::InternalError(format!("ttl out of range: {ttl_secs}")))?;
        let expire_at = self.clock.now() + Duration::seconds(ttl);
        self.entries.insert(
            user_id,
            Entry {
                token: token.to_owned(),
                expire_at,
            },
        );
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, AuthError> {
        let now = self.clock.now();
        // drop the read guard before a possible removal on the same shard
        let found = self
            .entries
            .get(&user_id)
            .map(|entry| (entry.token.clone(), entry.expire_at));

        match found {
            Some((token, expire_at)) if now < expire_at => Ok(Some(token)),
            Some(_) => {
                self.entries
                    .remove_if(&user_id, |_, entry| entry.expire_at <= now);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
