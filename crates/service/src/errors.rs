use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result taxonomy surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Success,
    Error,
    Unauthorized,
    NotFound,
    ValidationError,
}

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("mail error: {0}")]
    Mail(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn validation(message: &str) -> Self {
        Self::Validation { message: message.to_string(), fields: BTreeMap::new() }
    }

    /// Tag used when mapping this error onto the action taxonomy.
    pub fn status(&self) -> ActionStatus {
        match self {
            Self::Validation { .. } => ActionStatus::ValidationError,
            Self::Unauthorized(_) => ActionStatus::Unauthorized,
            Self::NotFound(_) => ActionStatus::NotFound,
            Self::Db(_) | Self::Mail(_) | Self::Model(_) => ActionStatus::Error,
        }
    }
}

/// Accumulates field-level validation messages before any business logic runs.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_default().push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when no field failed, else a `Validation` error carrying the map.
    pub fn into_result(self, message: &str) -> Result<(), ServiceError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation { message: message.to_string(), fields: self.0 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_collect_per_field() {
        let mut errors = FieldErrors::default();
        errors.push("email", "invalide");
        errors.push("email", "trop long");
        errors.push("message", "requis");
        let err = errors.into_result("Le formulaire contient des erreurs").unwrap_err();
        match err {
            ServiceError::Validation { fields, .. } => {
                assert_eq!(fields["email"].len(), 2);
                assert_eq!(fields["message"], vec!["requis".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::default().into_result("n/a").is_ok());
    }

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert_eq!(ServiceError::validation("x").status(), ActionStatus::ValidationError);
        assert_eq!(ServiceError::not_found("x").status(), ActionStatus::NotFound);
        assert_eq!(ServiceError::Unauthorized("x".into()).status(), ActionStatus::Unauthorized);
        assert_eq!(ServiceError::Db("x".into()).status(), ActionStatus::Error);
    }
}
