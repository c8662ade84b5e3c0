use axum::extract::State;
use axum::Json;

use service::contacts::{self, ActionReport, ContactForm};

use super::auth::ServerState;
use crate::errors::ApiError;

#[utoipa::path(post, path = "/api/contact", tag = "contact", request_body = crate::openapi::ContactFormDoc, responses((status = 200, description = "Request recorded"), (status = 400, description = "Validation error")))]
pub async fn submit(
    State(state): State<ServerState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ActionReport>, ApiError> {
    let report = contacts::submit(&state.db, &state.caches, &state.notifier, form).await?;
    Ok(Json(report))
}
