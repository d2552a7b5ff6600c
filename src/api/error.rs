use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;
use crate::db::StoreError;

/// Service-level errors, each scoped to the request that raised it
#[derive(Debug)]
pub enum ServiceError {
    /// Record absent
    NotFound(String),

    /// Role or ownership mismatch
    Forbidden(String),

    /// Duplicate application or saved job
    Conflict(String),

    /// Input rejected before reaching storage
    Validation(String),

    /// Missing or invalid identity token
    Unauthorized,

    /// Storage failure
    Store(StoreError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Validation(msg) => write!(f, "{}", msg),
            ServiceError::Unauthorized => write!(f, "Not authorized, token failed"),
            ServiceError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                ServiceError::Conflict(format!("Duplicate record ({})", constraint))
            }
            // Identity tokens can name users that were never provisioned
            StoreError::MissingReference(_) => ServiceError::NotFound("User not found".to_string()),
            other => ServiceError::Store(other),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Store(e) => error!("Database error: {}", e),
            other => warn!("Request rejected ({}): {}", self.status_code(), other),
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
