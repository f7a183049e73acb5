// =====================================================================================
// File: service-farm/src/error.rs
// Description: Service-level errors: engine errors plus precondition/CAS/infra tags
// =====================================================================================

use actix_web::{HttpResponse, ResponseError};
use core_farm_engine::EngineError;
use thiserror::Error;

use crate::ports::PortError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error("Farm does not exist")]
    FarmNotFound,

    #[error("Not the farm owner")]
    NotOwner,

    #[error("Invalid signature")]
    BadSignature,

    #[error("Address is not whitelisted for sync")]
    NotWhitelisted,

    #[error("Concurrent save detected")]
    SessionConflict,

    #[error("Batch of {0} actions exceeds the configured maximum of {1}")]
    BatchTooLarge(usize, usize),

    #[error("External dependency unavailable: {0}")]
    ExternalUnavailable(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::FarmNotFound => ServiceError::FarmNotFound,
            PortError::SessionConflict => ServiceError::SessionConflict,
            PortError::Unavailable(msg) => ServiceError::ExternalUnavailable(msg),
        }
    }
}

impl ServiceError {
    /// Stable short tag identifying the error variant, shared by the JSON
    /// error body and the `farm_saves_rejected_total` metric label.
    pub fn tag(&self) -> &'static str {
        match self {
            ServiceError::FarmNotFound => "farm_not_found",
            ServiceError::NotOwner => "not_owner",
            ServiceError::BadSignature => "bad_signature",
            ServiceError::NotWhitelisted => "not_whitelisted",
            ServiceError::SessionConflict => "session_conflict",
            ServiceError::BatchTooLarge(_, _) => "batch_too_large",
            ServiceError::ExternalUnavailable(_) => "external_unavailable",
            ServiceError::Engine(_) => "engine_error",
        }
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        let status = match self {
            ServiceError::FarmNotFound => actix_web::http::StatusCode::FORBIDDEN,
            ServiceError::NotOwner => actix_web::http::StatusCode::FORBIDDEN,
            ServiceError::BadSignature => actix_web::http::StatusCode::FORBIDDEN,
            ServiceError::NotWhitelisted => actix_web::http::StatusCode::FORBIDDEN,
            ServiceError::SessionConflict => actix_web::http::StatusCode::CONFLICT,
            ServiceError::BatchTooLarge(_, _) => actix_web::http::StatusCode::BAD_REQUEST,
            ServiceError::ExternalUnavailable(_) => actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Engine(_) => actix_web::http::StatusCode::BAD_REQUEST,
        };
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.tag(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_conflict_maps_to_409() {
        let err = ServiceError::SessionConflict;
        assert_eq!(err.error_response().status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn farm_not_found_maps_to_403() {
        let err = ServiceError::FarmNotFound;
        assert_eq!(err.error_response().status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_error_maps_to_400() {
        let err = ServiceError::Engine(EngineError::TemporalOrder);
        assert_eq!(err.error_response().status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
