use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AdminUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, AuthError>;
    async fn create_admin(&self, email: &str, name: &str) -> Result<AdminUser, AuthError>;

    async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(
        &self,
        admin_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        admins: Mutex<HashMap<String, AdminUser>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>,  // key: admin_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.get(&email.to_lowercase()).cloned())
        }

        async fn create_admin(&self, email: &str, name: &str) -> Result<AdminUser, AuthError> {
            let mut admins = self.admins.lock().unwrap();
            let key = email.to_lowercase();
            if admins.contains_key(&key) {
                return Err(AuthError::Conflict);
            }
            let admin = AdminUser { id: Uuid::new_v4(), email: key.clone(), name: name.to_string() };
            admins.insert(key, admin.clone());
            Ok(admin)
        }

        async fn get_credentials(&self, admin_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&admin_id).cloned())
        }

        async fn upsert_password(
            &self,
            admin_id: Uuid,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { admin_id, password_hash, password_algorithm };
            creds.insert(admin_id, c.clone());
            Ok(c)
        }
    }
}
