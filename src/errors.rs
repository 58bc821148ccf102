// src/errors.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Authentication error")]
    AuthError,

    #[error("{0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidObjectId(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthError => StatusCode::UNAUTHORIZED,
            AppError::MongoDB(_)
            | AppError::Bson(_)
            | AppError::ConfigurationError(_)
            | AppError::ServiceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::InvalidObjectId(_) => "Invalid ID format".to_string(),
            AppError::AuthError => "Authentication failed".to_string(),
            _ if status.is_server_error() => {
                // Cause stays in the logs; clients get a generic message.
                tracing::error!("request failed: {}", self);
                "Operation failed, please try again".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::ValidationError(format!("Invalid request body: {}", err.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::ValidationError(format!("Invalid query: {}", err.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::ValidationError(format!("Invalid path: {}", err.body_text()))
    }
}

impl From<mongodb::bson::oid::Error> for AppError {
    fn from(err: mongodb::bson::oid::Error) -> Self {
        AppError::InvalidObjectId(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        AppError::ValidationError(messages.join(", "))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::ServiceError(format!("Password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::ServiceError(format!("Token error: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        AppError::ServiceError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::invalid_data("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidObjectId("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("Player").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AuthError.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::service("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_names_the_thing() {
        assert_eq!(AppError::not_found("Schedule").to_string(), "Schedule not found");
    }
}
