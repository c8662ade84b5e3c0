use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AdminUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, AuthError> {
        let res = models::admin::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|a| AdminUser { id: a.id, email: a.email, name: a.name }))
    }

    async fn create_admin(&self, email: &str, name: &str) -> Result<AdminUser, AuthError> {
        let created = models::admin::create(&self.db, email, name)
            .await
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(AdminUser { id: created.id, email: created.email, name: created.name })
    }

    async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::admin_credentials::find_for_admin(&self.db, admin_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| Credentials {
            admin_id: c.admin_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        admin_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let c = models::admin_credentials::upsert_password(
            &self.db,
            admin_id,
            password_hash,
            &password_algorithm,
        )
        .await
        .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials {
            admin_id: c.admin_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        })
    }
}
