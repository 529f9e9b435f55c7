use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use styling_payment_engine::{BookingApiError, ReconciliationError};
use thiserror::Error;

use crate::data_objects::{JsonResponse, ResponseStatus};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Missing required parameters")]
    MissingParameters,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameters => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client errors are reported with status `failed`, server errors with status `error`.
    fn error_response(&self) -> HttpResponse {
        let status =
            if self.status_code().is_client_error() { ResponseStatus::Failed } else { ResponseStatus::Error };
        HttpResponse::build(self.status_code()).json(JsonResponse::failure(status, self))
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::MissingParameters => Self::MissingParameters,
            ReconciliationError::StorageFailure(s) => Self::BackendError(s),
        }
    }
}

impl From<BookingApiError> for ServerError {
    fn from(e: BookingApiError) -> Self {
        match e {
            BookingApiError::InvalidRequest(s) => Self::InvalidRequestBody(s),
            BookingApiError::StorageError(e) => Self::BackendError(e.to_string()),
        }
    }
}
