//! Raw payloads coming from the filter bar and the pagination footer.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod filters;
pub mod pagination;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unknown filter field `{0}`")]
    UnknownField(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid toggle value `{0}`")]
    InvalidToggle(String),

    #[error("invalid records per page: {0}")]
    InvalidPageSize(#[from] TypeConstraintError),
}
