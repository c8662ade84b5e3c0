use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod admin;
pub mod auth;
pub mod contact;
pub mod site;

use auth::ServerState;

/// Build the full application router: static site, public API, authenticated
/// back-office and API docs.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    let public = Router::new()
        .nest_service("/", static_dir)
        .route("/health", get(site::health))
        .route("/robots.txt", get(site::robots_txt))
        .route("/sitemap.xml", get(site::sitemap_xml))
        .route("/api/contact", post(contact::submit));

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/api/admin/contacts", get(admin::list))
        .route(
            "/api/admin/contacts/:id",
            get(admin::get).delete(admin::delete),
        )
        .route("/api/admin/contacts/:id/status", patch(admin::update_status))
        .route("/api/admin/contacts/:id/archive", post(admin::archive))
        .route("/api/admin/contacts/:id/unarchive", post(admin::unarchive))
        .route("/api/admin/contacts/bulk/status", post(admin::bulk_update_status))
        .route("/api/admin/contacts/bulk/archive", post(admin::bulk_archive))
        .route("/api/admin/contacts/bulk/unarchive", post(admin::bulk_unarchive))
        .route("/api/admin/contacts/bulk/delete", post(admin::bulk_delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    public
        .merge(auth_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
