use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::auth::errors::AuthError;
use service::errors::{ActionStatus, ServiceError};
use std::collections::BTreeMap;
use tracing::error;

/// API error surfaced as a tagged JSON body. User-facing messages stay in
/// French; internals are logged and replaced by a generic message.
#[derive(Debug)]
pub struct ApiError {
    pub status_code: StatusCode,
    pub status: ActionStatus,
    pub message: String,
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status_code: StatusCode::UNAUTHORIZED,
            status: ActionStatus::Unauthorized,
            message: "Authentification requise".to_string(),
            fields: None,
        }
    }

    fn internal(detail: &str) -> Self {
        error!(error = %detail, "request failed");
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            status: ActionStatus::Error,
            message: "Une erreur est survenue. Veuillez réessayer.".to_string(),
            fields: None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation { message, fields } => Self {
                status_code: StatusCode::BAD_REQUEST,
                status: ActionStatus::ValidationError,
                message,
                fields: Some(fields),
            },
            ServiceError::Unauthorized(message) => Self {
                status_code: StatusCode::UNAUTHORIZED,
                status: ActionStatus::Unauthorized,
                message,
                fields: None,
            },
            ServiceError::NotFound(message) => Self {
                status_code: StatusCode::NOT_FOUND,
                status: ActionStatus::NotFound,
                message,
                fields: None,
            },
            other => Self::internal(&other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized | AuthError::NotFound => Self {
                status_code: StatusCode::UNAUTHORIZED,
                status: ActionStatus::Unauthorized,
                message: "Identifiants invalides".to_string(),
                fields: None,
            },
            AuthError::Validation(message) => Self {
                status_code: StatusCode::BAD_REQUEST,
                status: ActionStatus::ValidationError,
                message,
                fields: None,
            },
            other => Self::internal(&format!("auth error {}: {other}", other.code())),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: ActionStatus,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status,
            message: &self.message,
            fields: self.fields.as_ref(),
        };
        (self.status_code, Json(body)).into_response()
    }
}
