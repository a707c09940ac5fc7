//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, positive
//! page sizes) so that once a value reaches the domain layer it can be treated
//! as trusted.
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided page size was zero or negative.
    #[error("page size must be a positive integer")]
    NonPositivePageSize,
    /// Provided page size could not be parsed as a number.
    #[error("page size is not a number: {0}")]
    NonNumericPageSize(String),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    LocationId,
    "Stable identifier of a location record, unique within a record set."
);

non_empty_string_newtype!(
    RecordTypeId,
    "Record type identifier returned by the object metadata service."
);

/// Number of records shown per page. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Page size used when the caller configures nothing.
    pub const DEFAULT: usize = 15;

    /// Creates a page size ensuring it is greater than zero.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(TypeConstraintError::NonPositivePageSize)
    }

    /// Returns the raw number of records per page.
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        // DEFAULT is a non-zero literal.
        Self(NonZeroUsize::MIN.saturating_add(Self::DEFAULT - 1))
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageSize {
    type Err = TypeConstraintError;

    /// Parses the string-typed `recordsPerPage` setting, rejecting empty,
    /// non-numeric, zero and negative input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        match trimmed.parse::<i64>() {
            Ok(value) if value > 0 => {
                let value = usize::try_from(value)
                    .map_err(|_| TypeConstraintError::InvalidValue(trimmed.to_string()))?;
                Self::new(value)
            }
            Ok(_) => Err(TypeConstraintError::NonPositivePageSize),
            Err(_) => Err(TypeConstraintError::NonNumericPageSize(trimmed.to_string())),
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}
