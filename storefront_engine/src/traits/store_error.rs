use std::borrow::Cow;

use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::db_types::StatusId;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Errors raised by storefront database backends.
///
/// Driver errors are classified on conversion, so that callers can tell a bad foreign key (a client error) from a
/// stalled store (a transient error) without inspecting driver internals.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("A referenced record does not exist. {0}")]
    ReferenceNotFound(String),
    #[error("The write would violate a data constraint. {0}")]
    ConstraintViolation(String),
    #[error("The store is unavailable or busy. {0}")]
    StoreUnavailable(String),
    #[error("The order cannot be placed. {0}")]
    InvalidOrder(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("An order cannot move from status {from} to status {to}")]
    IllegalTransition { from: StatusId, to: StatusId },
}

impl StoreError {
    /// True for failures that might succeed if retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::StoreUnavailable(_))
    }
}

fn is_busy_code(code: Option<Cow<'_, str>>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok()).map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED)).unwrap_or(false)
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::StoreUnavailable(e.to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::ForeignKeyViolation => StoreError::ReferenceNotFound(db_err.message().to_string()),
                ErrorKind::UniqueViolation | ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    StoreError::ConstraintViolation(db_err.message().to_string())
                },
                _ if is_busy_code(db_err.code()) => StoreError::StoreUnavailable(db_err.message().to_string()),
                _ => StoreError::DatabaseError(e.to_string()),
            },
            _ => StoreError::DatabaseError(e.to_string()),
        }
    }
}
