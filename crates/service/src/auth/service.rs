use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AdminUser, AuthSession, Claims, LoginInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub session_hours: i64,
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, session_hours: 12, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Create an admin account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let admin = tokio_test::block_on(svc.register("diet@example.fr", "Claire", "Secret123")).unwrap();
    /// assert_eq!(admin.email, "diet@example.fr");
    /// ```
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        if password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_admin_by_email(email).await? {
            debug!("admin exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let admin = self.repo.create_admin(email, name).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self
            .repo
            .upsert_password(admin.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(admin_id = %admin.id, email = %admin.email, "admin_registered");
        Ok(admin)
    }

    /// Register the configured admin unless it already exists. Returns the
    /// account only when it was created.
    pub async fn seed_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, AuthError> {
        match self.register(email, name, password).await {
            Ok(admin) => Ok(Some(admin)),
            Err(AuthError::Conflict) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Authenticate an admin and issue a session token when a secret is set.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() };
    /// let svc = AuthService::new(repo.clone(), cfg);
    /// let _ = tokio_test::block_on(svc.register("diet@example.fr", "Claire", "Passw0rd"));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "diet@example.fr".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.admin.email, "diet@example.fr");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let admin = self
            .repo
            .find_admin_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(admin.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed =
            PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.session_hours))
                .timestamp() as usize;
            let claims = Claims { sub: admin.email.clone(), uid: admin.id.to_string(), exp };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        Ok(AuthSession { admin, token })
    }

    /// Decode and validate a session token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let secret = self
            .cfg
            .jwt_secret
            .as_ref()
            .ok_or_else(|| AuthError::TokenError("no jwt secret configured".into()))?;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::Unauthorized)?;
        Ok(data.claims)
    }
}
