use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserDirectory { pool }
    }
}

// Only id and mobile are selected; password and otp columns stay in the table.
fn identity_from_row(row: &MySqlRow) -> Result<Identity, AuthError> {
    Ok(Identity {
        id: row
            .try_get::<UserId, _>("user_id")
            .map_err(|e| AuthError::InternalError(format!("decode user_id: {e}")))?,
        mobile: Mobile(
            row.try_get::<String, _>("mobile")
                .map_err(|e| AuthError::InternalError(format!("decode mobile: {e}")))?,
        ),
    })
}

#[async_trait::async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query("SELECT user_id, mobile FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::InternalError(format!("query user by id: {e}")))?;

        row.as_ref().map(identity_from_row).transpose()
    }

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query("SELECT user_id, mobile FROM user WHERE mobile = ?")
            .bind(mobile.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::InternalError(format!("query user by mobile: {e}")))?;

        row.as_ref().map(identity_from_row).transpose()
    }
}
