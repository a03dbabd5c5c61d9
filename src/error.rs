use actix_web::{http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::dispatch::renderer::RendererError;
use crate::store::StoreError;
use crate::ErrorResponse;

/// Errors surfaced by the domain services.
///
/// Every variant maps to one HTTP status and one `ErrorResponse.error` tag so
/// the routing layer never has to inspect error internals.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("failed to allocate a unique access code after {0} attempts")]
    CodeExhausted(u32),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Precondition(String),
    #[error("email delivery failed: {0}")]
    Transport(String),
    #[error("failed to produce letter artifact: {0}")]
    Render(#[from] RendererError),
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
    #[error("filesystem failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "NotFound",
            ServiceError::CodeExhausted(_) => "Conflict",
            ServiceError::Validation(_) => "ValidationFailure",
            ServiceError::Precondition(_) => "PreconditionFailure",
            ServiceError::Transport(_) => "TransportFailure",
            ServiceError::Store(StoreError::CodeTaken) => "Conflict",
            ServiceError::Render(_) | ServiceError::Store(_) | ServiceError::Io(_) => {
                "InternalServerError"
            }
        }
    }
}

impl actix_web::error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Precondition(_) | ServiceError::CodeExhausted(_) => StatusCode::CONFLICT,
            ServiceError::Store(StoreError::CodeTaken) => StatusCode::CONFLICT,
            ServiceError::Transport(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Render(_) | ServiceError::Store(_) | ServiceError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.kind(), &self.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
