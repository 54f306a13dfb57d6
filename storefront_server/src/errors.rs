use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use storefront_engine::{OrderFlowError, ValidationError};
use thiserror::Error;

use crate::data_objects::ErrorBody;

static DEV_MODE: AtomicBool = AtomicBool::new(false);

/// When dev mode is on, 422 and 5xx responses carry the underlying error text in an `error` field.
pub fn set_dev_mode(enabled: bool) {
    DEV_MODE.store(enabled, Ordering::Relaxed);
}

fn dev_mode() -> bool {
    DEV_MODE.load(Ordering::Relaxed)
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request refers to data that does not exist. {0}")]
    IntegrityError(String),
    #[error("The request violates a data constraint. {0}")]
    ConstraintError(String),
    #[error("{0}")]
    IllegalTransition(String),
    #[error("The service is temporarily unavailable. {0}")]
    Unavailable(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    /// The JSON body returned for this error.
    ///
    /// Client errors describe themselves. Integrity and server errors get a fixed message, and only include the
    /// database's own text when `dev_mode` is set.
    pub fn error_body(&self, dev_mode: bool) -> ErrorBody {
        let body = match self {
            Self::ValidationError(e) => return ErrorBody::new(&e.message).with_field(&e.field),
            Self::InvalidRequestBody(_) |
            Self::InvalidRequestPath(_) |
            Self::NoRecordFound(_) |
            Self::IllegalTransition(_) => return ErrorBody::new(self),
            Self::IntegrityError(_) => {
                ErrorBody::new("A referenced client, payment method, product, order or status does not exist.")
            },
            Self::ConstraintError(_) => ErrorBody::new("The request breaks a rule of the stored data."),
            Self::Unavailable(_) => ErrorBody::new("The service is busy. Please try again shortly."),
            Self::InitializeError(_) | Self::IOError(_) | Self::BackendError(_) | Self::Unspecified(_) => {
                ErrorBody::new("An internal error occurred.")
            },
        };
        if dev_mode {
            body.with_error(self)
        } else {
            body
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::IntegrityError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ConstraintError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::IllegalTransition(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {status}: {self}");
        } else {
            debug!("💻️ {status}: {self}");
        }
        let body = serde_json::to_string(&self.error_body(dev_mode())).unwrap_or_default();
        HttpResponse::build(status).insert_header(ContentType::json()).body(body)
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(e) => Self::ValidationError(e),
            OrderFlowError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::RecordNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::InvalidReference(s) => Self::IntegrityError(s),
            OrderFlowError::ConstraintViolation(s) => Self::ConstraintError(s),
            OrderFlowError::IllegalTransition { .. } => Self::IllegalTransition(e.to_string()),
            OrderFlowError::StoreUnavailable(s) => Self::Unavailable(s),
            OrderFlowError::DatabaseError(s) => Self::BackendError(s),
        }
    }
}
