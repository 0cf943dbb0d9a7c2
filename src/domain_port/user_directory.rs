use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, AuthError>;

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Identity>, AuthError>;
}
