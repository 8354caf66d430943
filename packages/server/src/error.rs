//! Request outcomes that map to error responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use footprints_database::DbError;
use footprints_server_models::ApiErrorBody;

use crate::serializer::PayloadError;

/// Message returned for unknown building ids.
pub const NOT_FOUND_MESSAGE: &str = "Building matching query does not exist";

/// Errors returned by the building endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was rejected.
    #[error("Bad request: {}", .0.join("; "))]
    BadRequest(Vec<String>),

    /// No building has the requested id.
    #[error("{NOT_FOUND_MESSAGE}")]
    NotFound,

    /// Storage failed; details are logged, not returned.
    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        log::debug!("Rejected building payload: {e}");
        Self::BadRequest(vec![e.to_string()])
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            Self::BadRequest(messages) => messages.clone(),
            Self::NotFound => vec![NOT_FOUND_MESSAGE.to_string()],
            Self::Database(e) => {
                log::error!("Storage failure: {e}");
                vec!["Internal server error".to_string()]
            }
        };

        HttpResponse::build(self.status_code()).json(ApiErrorBody { detail })
    }
}
