use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: DashMap<UserId, Identity>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identity: Identity) {
        self.users.insert(identity.id, identity);
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, AuthError> {
        Ok(self.users.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .users
            .iter()
            .find(|entry| &entry.mobile == mobile)
            .map(|entry| entry.value().clone()))
    }
}
