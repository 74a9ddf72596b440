//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use carelog_core::limiter::RateLimitDecision;
use carelog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    /// Quota exhausted; carries the decision so the 429 response can expose
    /// the standard rate-limit headers.
    RateLimited(RateLimitDecision),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::RateLimited(_) => write!(f, "Too many requests"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::RateLimited(decision) => {
                let retry_after_secs = decision
                    .retry_after
                    .map(|d| d.as_secs())
                    .unwrap_or(1)
                    .max(1);
                HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", retry_after_secs.to_string()))
                    .insert_header(("X-RateLimit-Limit", decision.limit.to_string()))
                    .insert_header(("X-RateLimit-Remaining", decision.remaining.to_string()))
                    .insert_header(("X-RateLimit-Reset", decision.reset_at.timestamp().to_string()))
                    .json(ErrorResponse::too_many_requests(retry_after_secs))
            }
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail))
            }
            AppError::BadRequest(detail) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail))
            }
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

// Conversion from domain errors
impl From<carelog_core::error::DomainError> for AppError {
    fn from(err: carelog_core::error::DomainError) -> Self {
        match err {
            carelog_core::error::DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            carelog_core::error::DomainError::Validation(msg) => AppError::BadRequest(msg),
            carelog_core::error::DomainError::Unauthorized => AppError::Unauthorized,
            carelog_core::error::DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<carelog_core::error::RepoError> for AppError {
    fn from(err: carelog_core::error::RepoError) -> Self {
        match err {
            carelog_core::error::RepoError::NotFound => {
                AppError::NotFound("Resource not found".to_string())
            }
            carelog_core::error::RepoError::Constraint(msg) => AppError::BadRequest(msg),
            carelog_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            carelog_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
