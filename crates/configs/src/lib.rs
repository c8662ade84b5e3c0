use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Public site identity, used for sitemap/robots generation and outgoing mail.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
}

fn default_base_url() -> String { "http://localhost:8080".into() }
fn default_site_name() -> String { "Cabinet Diététique".into() }

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_site_name(),
            contact_email: String::new(),
            contact_phone: String::new(),
        }
    }
}

/// Transactional mail settings. Without an API key, outgoing mail is disabled.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub notify_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_session_hours() -> i64 { 12 }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_hours: default_session_hours(),
            admin_email: None,
            admin_name: None,
            admin_password: None,
        }
    }
}

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields the
/// defaults so env-only deployments keep working.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.site.normalize_from_env();
        self.site.validate()?;
        self.mail.normalize_from_env();
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; set it in config.toml or via DATABASE_URL"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl SiteConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("SITE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        if self.contact_email.trim().is_empty() {
            if let Ok(email) = std::env::var("CONTACT_EMAIL") {
                self.contact_email = email;
            }
        }
        if self.contact_phone.trim().is_empty() {
            if let Ok(phone) = std::env::var("CONTACT_PHONE") {
                self.contact_phone = phone;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!("site.base_url must start with http:// or https://"));
        }
        Ok(())
    }
}

impl MailConfig {
    pub fn normalize_from_env(&mut self) {
        if self.api_key.is_none() {
            if let Ok(key) = std::env::var("RESEND_API_KEY") {
                if !key.trim().is_empty() {
                    self.api_key = Some(key);
                }
            }
        }
        if self.from.trim().is_empty() {
            self.from = std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "onboarding@resend.dev".to_string());
        }
        if self.notify_to.trim().is_empty() {
            if let Ok(to) = std::env::var("MAIL_NOTIFY_TO") {
                self.notify_to = to;
            }
        }
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string());
        }
        if self.admin_email.is_none() {
            self.admin_email = std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty());
        }
        if self.admin_name.is_none() {
            self.admin_name = std::env::var("ADMIN_NAME").ok().filter(|v| !v.trim().is_empty());
        }
        if self.admin_password.is_none() {
            self.admin_password =
                std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_hours <= 0 {
            return Err(anyhow!("auth.session_hours must be positive"));
        }
        if let Some(pw) = &self.admin_password {
            if pw.len() < 8 {
                return Err(anyhow!("auth.admin_password must be at least 8 characters"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation_except_database_url() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://postgres@localhost/cabinet".into();
        assert!(cfg.normalize_and_validate().is_ok());
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_non_postgres_database_url() {
        let mut db = DatabaseConfig::default();
        db.url = "mysql://root@localhost/cabinet".into();
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_invalid_site_base_url() {
        let site = SiteConfig { base_url: "localhost:8080".into(), ..SiteConfig::default() };
        assert!(site.validate().is_err());
    }

    #[test]
    fn parses_full_toml_document() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 3000

            [database]
            url = "postgres://postgres@localhost/cabinet"

            [site]
            base_url = "https://www.example.fr"
            name = "Cabinet Test"
            contact_email = "contact@example.fr"

            [mail]
            from = "site@example.fr"
            notify_to = "dieteticienne@example.fr"

            [auth]
            jwt_secret = "super-secret"
            session_hours = 24
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.site.name, "Cabinet Test");
        assert_eq!(cfg.auth.session_hours, 24);
    }
}
