//! Error handling for the Sembrando Bits dashboard service
//!
//! Provides consistent error responses in Spanish and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::CompatibilityError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("Sensor service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid response from sensor service: {0}")]
    UpstreamResponse(String),

    // Startup errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<CompatibilityError> for AppError {
    fn from(err: CompatibilityError) -> Self {
        match err {
            CompatibilityError::UnknownCrop(crop_id) => AppError::NotFound(format!("crop {}", crop_id)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid {}", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("body".to_string(), errors.to_string()));

        AppError::Validation {
            message_es: format!("Valor no válido para {}", field),
            field,
            message,
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// HTTP status and body for this error
    pub fn detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "UPSTREAM_UNAVAILABLE".to_string(),
                    message_en: format!("Sensor service is unavailable: {}", msg),
                    message_es: "No se pudo conectar con el servidor de sensores".to_string(),
                    field: None,
                },
            ),
            AppError::UpstreamResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "UPSTREAM_RESPONSE_ERROR".to_string(),
                    message_en: format!("Unexpected response from sensor service: {}", msg),
                    message_es: "Respuesta inesperada del servidor de sensores".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
        }
    }

    /// True for failures of the sensor service rather than of this one
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable(_) | AppError::UpstreamResponse(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
