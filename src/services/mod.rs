//! Stateful services of the location list.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod filters;
pub mod list;
pub mod navigation;
pub mod picklist;
pub mod runtime;
pub mod schedule;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The record service rejected the request or returned an error payload.
    #[error("Failed to fetch locations: {0}")]
    FetchFailure(String),

    /// The stored filter blob could not be read back.
    #[error("Malformed persisted filters: {0}")]
    MalformedPersistedState(String),

    #[error("Start date must be on or before the closing date")]
    InvalidDateRange,

    #[error("Failed to load picklist values: {0}")]
    PicklistLoadFailure(String),

    #[error("Invalid records per page: {0}")]
    InvalidPageSize(TypeConstraintError),

    #[error("Invalid value: {0}")]
    InvalidValue(#[from] TypeConstraintError),

    #[error("Invalid input: {0}")]
    Form(#[from] FormError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The list runtime is no longer running.
    #[error("Location list has been shut down")]
    Shutdown,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
