//! The module contains the errors the finance core can return.
//!
//! Every kind is kept distinct so the RPC layer can map each one to its own
//! status:
//!
//! - [`NotFound`] a lookup expected one row and found none.
//! - [`AlreadyExists`] a number id is already registered for the warehouse,
//!   or a row for the same natural key was inserted concurrently.
//! - [`Conflict`] the warehouse already has an operational account.
//! - [`PermissionDenied`] the actor's team type may not perform the change.
//! - [`InvalidState`] a loaded handle does not belong to the service scope.
//! - [`Validation`] required input is missing or malformed.
//! - [`Locked`] a no-wait row lock could not be acquired; retry later.
//!
//!  [`NotFound`]: FinanceError::NotFound
//!  [`AlreadyExists`]: FinanceError::AlreadyExists
//!  [`Conflict`]: FinanceError::Conflict
//!  [`PermissionDenied`]: FinanceError::PermissionDenied
//!  [`InvalidState`]: FinanceError::InvalidState
//!  [`Validation`]: FinanceError::Validation
//!  [`Locked`]: FinanceError::Locked
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Finance core errors.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("row locked: {0}")]
    Locked(String),
    #[error(transparent)]
    Database(DbErr),
}

impl FinanceError {
    /// True when the caller may retry the whole transaction after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

impl From<DbErr> for FinanceError {
    fn from(err: DbErr) -> Self {
        if is_lock_not_available(&err) {
            return Self::Locked(err.to_string());
        }
        Self::Database(err)
    }
}

impl PartialEq for FinanceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::PermissionDenied(a), Self::PermissionDenied(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Locked(a), Self::Locked(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// PostgreSQL reports `55P03 lock_not_available` for `FOR UPDATE NOWAIT`,
/// MySQL reports error 3572 mentioning `NOWAIT`.
fn is_lock_not_available(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("55P03")
        || message.contains("could not obtain lock")
        || message.contains("NOWAIT is set")
}

/// Returns the driver message when `err` is a unique-index violation.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
