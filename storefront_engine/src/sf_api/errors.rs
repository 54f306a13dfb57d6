use std::fmt::Display;

use thiserror::Error;

use crate::{db_types::StatusId, traits::StoreError};

/// A request was rejected before touching the store. `field` names the offending input, in the same camelCase form
/// the JSON API uses (e.g. `items[1].quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new<F: Display, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: field.to_string(), message: message.into() }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Invalid request. {0}")]
    Validation(#[from] ValidationError),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("{0} does not exist")]
    RecordNotFound(String),
    #[error("A referenced record does not exist. {0}")]
    InvalidReference(String),
    #[error("The request violates a data constraint. {0}")]
    ConstraintViolation(String),
    #[error("An order cannot move from status {from} to status {to}")]
    IllegalTransition { from: StatusId, to: StatusId },
    #[error("The store is temporarily unavailable. {0}")]
    StoreUnavailable(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for OrderFlowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DatabaseError(s) => Self::DatabaseError(s),
            StoreError::ReferenceNotFound(s) => Self::InvalidReference(s),
            StoreError::ConstraintViolation(s) => Self::ConstraintViolation(s),
            StoreError::StoreUnavailable(s) => Self::StoreUnavailable(s),
            StoreError::InvalidOrder(s) => Self::Validation(ValidationError::new("items", s)),
            StoreError::OrderNotFound(id) => Self::OrderNotFound(id),
            StoreError::IllegalTransition { from, to } => Self::IllegalTransition { from, to },
        }
    }
}
