use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use homeval_core::InferenceError;
use homeval_geocode::GeocodeError;
use serde::Serialize;
use thiserror::Error;

/// Failures of a `/predict` request, each with its own status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Service not ready: model artifacts are not loaded")]
    NotReady,

    #[error("{0}")]
    Validation(String),

    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("{0}")]
    Inference(#[from] InferenceError),
}

/// Error body returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    /// Message safe to show the caller. Provider errors are only logged.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Geocode(_) => "reverse geocoding failed".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            ApiError::Validation(msg) => tracing::debug!("Rejected request body: {}", msg),
            ApiError::NotReady => tracing::warn!("Prediction requested while not ready"),
            ApiError::Geocode(e) => tracing::warn!("Reverse geocoding failed: {}", e),
            ApiError::Inference(e) => tracing::error!("Inference failed: {}", e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Geocode(_) => StatusCode::BAD_GATEWAY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.detail(),
        })
    }
}
