//! Back-office endpoints over contact requests. Everything here sits behind
//! [`super::auth::require_admin`].

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::contact_request::ContactStatus;
use service::contacts::{self, ActionReport, ContactDetail, ContactListQuery, ContactPage};

use super::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: ContactStatus,
}

#[derive(Debug, Deserialize)]
pub struct IdsInput {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusInput {
    pub ids: Vec<Uuid>,
    pub status: ContactStatus,
}

#[utoipa::path(get, path = "/api/admin/contacts", tag = "admin",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("q" = Option<String>, Query, description = "Search in name, email and message"),
        ("sort" = Option<String>, Query, description = "created_at | name | status"),
        ("order" = Option<String>, Query, description = "asc | desc"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size (max 100)"),
    ),
    responses((status = 200, description = "One page of contact requests"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ContactPage>, ApiError> {
    let page = contacts::list(&state.db, &state.caches, query).await?;
    Ok(Json(page))
}

#[utoipa::path(get, path = "/api/admin/contacts/{id}", tag = "admin",
    params(("id" = Uuid, Path, description = "Contact request id")),
    responses((status = 200, description = "Contact request detail"), (status = 404, description = "Not found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactDetail>, ApiError> {
    let detail = contacts::get(&state.db, &state.caches, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(patch, path = "/api/admin/contacts/{id}/status", tag = "admin",
    params(("id" = Uuid, Path, description = "Contact request id")),
    request_body = crate::openapi::StatusInputDoc,
    responses((status = 200, description = "Status updated"), (status = 404, description = "Not found")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> Result<Json<ActionReport>, ApiError> {
    info!(%id, status = ?input.status, "admin status update");
    let report = contacts::update_status_one(&state.db, &state.caches, id, input.status).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/{id}/archive", tag = "admin",
    params(("id" = Uuid, Path, description = "Contact request id")),
    responses((status = 200, description = "Archived"), (status = 404, description = "Not found")))]
pub async fn archive(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionReport>, ApiError> {
    let report = contacts::archive_one(&state.db, &state.caches, id).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/{id}/unarchive", tag = "admin",
    params(("id" = Uuid, Path, description = "Contact request id")),
    responses((status = 200, description = "Restored to pending"), (status = 404, description = "Not found")))]
pub async fn unarchive(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionReport>, ApiError> {
    let report = contacts::unarchive_one(&state.db, &state.caches, id).await?;
    Ok(Json(report))
}

#[utoipa::path(delete, path = "/api/admin/contacts/{id}", tag = "admin",
    params(("id" = Uuid, Path, description = "Contact request id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionReport>, ApiError> {
    info!(%id, "admin delete");
    let report = contacts::delete_one(&state.db, &state.caches, id).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/bulk/status", tag = "admin",
    request_body = crate::openapi::BulkStatusInputDoc,
    responses((status = 200, description = "Statuses updated"), (status = 404, description = "No request found")))]
pub async fn bulk_update_status(
    State(state): State<ServerState>,
    Json(input): Json<BulkStatusInput>,
) -> Result<Json<ActionReport>, ApiError> {
    info!(count = input.ids.len(), status = ?input.status, "admin bulk status update");
    let report =
        contacts::update_status(&state.db, &state.caches, &input.ids, input.status).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/bulk/archive", tag = "admin",
    request_body = crate::openapi::IdsInputDoc,
    responses((status = 200, description = "Archived"), (status = 404, description = "No request found")))]
pub async fn bulk_archive(
    State(state): State<ServerState>,
    Json(input): Json<IdsInput>,
) -> Result<Json<ActionReport>, ApiError> {
    let report = contacts::archive(&state.db, &state.caches, &input.ids).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/bulk/unarchive", tag = "admin",
    request_body = crate::openapi::IdsInputDoc,
    responses((status = 200, description = "Restored to pending"), (status = 404, description = "No request found")))]
pub async fn bulk_unarchive(
    State(state): State<ServerState>,
    Json(input): Json<IdsInput>,
) -> Result<Json<ActionReport>, ApiError> {
    let report = contacts::unarchive(&state.db, &state.caches, &input.ids).await?;
    Ok(Json(report))
}

#[utoipa::path(post, path = "/api/admin/contacts/bulk/delete", tag = "admin",
    request_body = crate::openapi::IdsInputDoc,
    responses((status = 200, description = "Deleted"), (status = 404, description = "No request found")))]
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(input): Json<IdsInput>,
) -> Result<Json<ActionReport>, ApiError> {
    info!(count = input.ids.len(), "admin bulk delete");
    let report = contacts::delete(&state.db, &state.caches, &input.ids).await?;
    Ok(Json(report))
}
