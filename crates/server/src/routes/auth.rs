use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use configs::AppConfig;
use service::auth::domain::LoginInput;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::contacts::ContactCaches;
use service::mailer::Notifier;

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub caches: Arc<ContactCaches>,
    pub notifier: Arc<Notifier>,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: Some(self.config.auth.jwt_secret.clone()),
                session_hours: self.config.auth.session_hours,
                password_algorithm: "argon2".into(),
            },
        )
    }
}

/// Admin identity injected by [`require_admin`] for downstream handlers.
#[derive(Debug, Clone, Copy)]
pub struct AdminId(pub Uuid);

#[derive(Serialize)]
pub struct LoginOutput {
    pub admin_id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub admin_id: Uuid,
    pub email: String,
    pub name: String,
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let svc = state.auth_service();
    let session = svc.login(input).await?;
    let admin = session.admin;
    let token = session.token.ok_or_else(ApiError::unauthorized)?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    Ok((jar, Json(LoginOutput { admin_id: admin.id, email: admin.email, name: admin.name })))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 204, description = "Logged out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    // removal must carry the same Path as login, or clients keep the cookie
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Current admin"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<Json<MeOutput>, ApiError> {
    let token = jar.get(AUTH_COOKIE).ok_or_else(ApiError::unauthorized)?;
    let claims = state.auth_service().verify_token(token.value())?;
    let admin = models::admin::find_by_email(&state.db, &claims.sub)
        .await
        .map_err(service::errors::ServiceError::from)?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(Json(MeOutput { admin_id: admin.id, email: admin.email, name: admin.name }))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[tokio::test]
    async fn logout_removal_cookie_covers_the_whole_site() {
        // Build the jar from a request header so the cookie counts as an
        // "original" cookie; `remove` only emits a removal Set-Cookie for
        // originals, matching how axum extracts the jar in production.
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("{AUTH_COOKIE}=some-token").parse().unwrap(),
        );
        let jar = CookieJar::from_headers(&headers);
        let (jar, status) = logout(jar).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let response = jar.into_response();
        let removal = response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|c| c.starts_with(AUTH_COOKIE))
            .expect("removal Set-Cookie present")
            .to_string();
        assert!(removal.contains("Path=/"), "removal must match the login path: {removal}");
        assert!(removal.contains("Max-Age=0"), "removal must expire the cookie: {removal}");
    }
}

/// Route-layer guard for the back-office: a valid session cookie is required;
/// the admin id from the claims is inserted as a request extension.
pub async fn require_admin(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(AUTH_COOKIE).ok_or_else(ApiError::unauthorized)?;
    let claims = state
        .auth_service()
        .verify_token(token.value())
        .map_err(|_| ApiError::unauthorized())?;
    let admin_id = claims
        .uid
        .parse::<Uuid>()
        .map_err(|_| ApiError::unauthorized())?;
    req.extensions_mut().insert(AdminId(admin_id));
    Ok(next.run(req).await)
}
