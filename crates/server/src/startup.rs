use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::contacts::ContactCaches;
use service::mailer::{Mailer, NoopMailer, Notifier, ResendMailer};

use crate::routes::{self, auth::ServerState};

fn init_logging() {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn build_notifier(config: &AppConfig) -> Notifier {
    let mailer: Arc<dyn Mailer> = match &config.mail.api_key {
        Some(key) => Arc::new(ResendMailer::new(key.clone())),
        None => {
            warn!("mail.api_key not set; contact notifications are disabled");
            Arc::new(NoopMailer)
        }
    };
    Notifier::new(
        mailer,
        config.mail.from.clone(),
        config.mail.notify_to.clone(),
        config.site.name.clone(),
    )
}

async fn seed_admin(state: &ServerState) -> anyhow::Result<()> {
    let auth = &state.config.auth;
    let (Some(email), Some(password)) = (&auth.admin_email, &auth.admin_password) else {
        warn!("no admin account configured; back-office login will fail until one is seeded");
        return Ok(());
    };
    let name = auth.admin_name.as_deref().unwrap_or("Admin");
    match state.auth_service().seed_admin(email, name, password).await? {
        Some(admin) => info!(email = %admin.email, "admin account created"),
        None => info!(email = %email, "admin account already present"),
    }
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let config = Arc::new(AppConfig::load_and_validate()?);
    common::env::ensure_env("frontend").await;

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState {
        db,
        config: Arc::clone(&config),
        caches: Arc::new(ContactCaches::new()),
        notifier: Arc::new(build_notifier(&config)),
    };
    seed_admin(&state).await?;

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, site = %config.site.name, "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
