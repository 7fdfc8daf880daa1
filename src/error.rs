use axum::{http::StatusCode, Json};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

use crate::wizard::Field;

/// Per-field validation messages, ordered by field for stable display
pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug)]
pub enum AppError {
    /// One or more intake fields failed their step gate
    Validation(FieldErrors),
    /// The create-application call failed (network or backend rejection)
    Submission(String),
    /// A wizard action was attempted from a step that does not allow it
    InvalidTransition(String),
    Backend(String),
    Http(reqwest::Error),
    Serialization(serde_json::Error),
    NotFound(String),
    BadRequest(String),
    Authentication(String),
    Configuration(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.keys().map(|field| field.as_str()).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            AppError::Submission(e) => write!(f, "Submission failed: {}", e),
            AppError::InvalidTransition(e) => write!(f, "Invalid transition: {}", e),
            AppError::Backend(e) => write!(f, "Backend error: {}", e),
            AppError::Http(e) => write!(f, "HTTP error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AppError::NotFound(e) => write!(f, "Not found: {}", e),
            AppError::BadRequest(e) => write!(f, "Bad request: {}", e),
            AppError::Authentication(e) => write!(f, "Authentication failed: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Http(e) => Some(e),
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

// HTTPレスポンスへの変換
impl AppError {
    pub fn to_response(&self) -> (StatusCode, Json<serde_json::Value>) {
        let status = match self {
            AppError::Validation(errors) => {
                let fields: serde_json::Map<String, serde_json::Value> = errors
                    .iter()
                    .map(|(field, message)| (field.as_str().to_string(), json!(message)))
                    .collect();
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": self.to_string(), "fields": fields })),
                );
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            AppError::Serialization(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Submission(_) | AppError::Backend(_) | AppError::Http(_) => {
                tracing::error!("{}", self);
                StatusCode::BAD_GATEWAY
            }
            AppError::Configuration(_) | AppError::Internal(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() })))
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.to_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Email, "Enter a valid email address".to_string());
        errors.insert(Field::IdValue, "National ID must be exactly 8 digits".to_string());

        let err = AppError::Validation(errors);
        assert_eq!(err.to_string(), "Validation failed for: email, idValue");

        let (status, Json(body)) = err.to_response();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"]["email"], "Enter a valid email address");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, Json(body)) = AppError::NotFound("applications/9".to_string()).to_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: applications/9");
    }
}
