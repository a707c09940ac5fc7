//! Filter criteria applied to the location list and the date-range rule that
//! guards them.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::TypeConstraintError;

/// Message attached to the start date when it falls after the closing date.
pub const START_DATE_MESSAGE: &str = "Please set the Start Date to be on or before the Close Date.";
/// Message attached to the closing date when it falls before the start date.
pub const CLOSING_DATE_MESSAGE: &str = "Please set the Close Date to be on or after the Start Date.";

/// User-specified search constraints. Every field defaults to its empty
/// sentinel, which means "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub vaccine_type: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "blank_as_none")]
    pub closing_date: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_false")]
    pub archived: bool,
}

impl FilterCriteria {
    /// Returns `true` when every field equals its empty sentinel.
    pub fn is_all_blank(&self) -> bool {
        self.name.is_empty()
            && self.address.is_empty()
            && self.vaccine_type.is_empty()
            && self.start_date.is_none()
            && self.closing_date.is_none()
            && !self.archived
    }

    /// Writes a single field, returning whether the stored value changed.
    pub fn apply(&mut self, update: FilterUpdate) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match update {
            FilterUpdate::Name(value) => replace(&mut self.name, value),
            FilterUpdate::Address(value) => replace(&mut self.address, value),
            FilterUpdate::VaccineType(value) => replace(&mut self.vaccine_type, value),
            FilterUpdate::StartDate(value) => replace(&mut self.start_date, value),
            FilterUpdate::ClosingDate(value) => replace(&mut self.closing_date, value),
            FilterUpdate::Archived(value) => replace(&mut self.archived, value),
        }
    }

    /// Checks the start/closing pair of this criteria set.
    pub fn date_range(&self) -> DateRangeReport {
        validate_date_range(self.start_date, self.closing_date)
    }
}

/// Identifies one filter input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
    Name,
    Address,
    VaccineType,
    StartDate,
    ClosingDate,
    Archived,
}

impl FilterField {
    /// Free-text inputs are debounced before they are committed.
    pub fn is_free_text(self) -> bool {
        matches!(self, FilterField::Name | FilterField::Address)
    }

    pub fn is_date(self) -> bool {
        matches!(self, FilterField::StartDate | FilterField::ClosingDate)
    }

    /// Input name used by the presentation layer and in persisted blobs.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Address => "address",
            FilterField::VaccineType => "vaccineType",
            FilterField::StartDate => "startDate",
            FilterField::ClosingDate => "closingDate",
            FilterField::Archived => "archived",
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(FilterField::Name),
            "address" => Ok(FilterField::Address),
            "vaccineType" | "vaccine_type" => Ok(FilterField::VaccineType),
            "startDate" | "start_date" => Ok(FilterField::StartDate),
            "closingDate" | "closing_date" => Ok(FilterField::ClosingDate),
            "archived" => Ok(FilterField::Archived),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown filter field `{other}`"
            ))),
        }
    }
}

/// New value for one filter field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterUpdate {
    Name(String),
    Address(String),
    VaccineType(String),
    StartDate(Option<NaiveDate>),
    ClosingDate(Option<NaiveDate>),
    Archived(bool),
}

impl FilterUpdate {
    pub fn field(&self) -> FilterField {
        match self {
            FilterUpdate::Name(_) => FilterField::Name,
            FilterUpdate::Address(_) => FilterField::Address,
            FilterUpdate::VaccineType(_) => FilterField::VaccineType,
            FilterUpdate::StartDate(_) => FilterField::StartDate,
            FilterUpdate::ClosingDate(_) => FilterField::ClosingDate,
            FilterUpdate::Archived(_) => FilterField::Archived,
        }
    }
}

/// Outcome of checking a start/closing date pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateRangeReport {
    pub valid: bool,
    pub start_message: Option<&'static str>,
    pub closing_message: Option<&'static str>,
}

impl DateRangeReport {
    fn ok() -> Self {
        Self {
            valid: true,
            start_message: None,
            closing_message: None,
        }
    }
}

impl Default for DateRangeReport {
    fn default() -> Self {
        Self::ok()
    }
}

/// Flags both dates when the start date lies after the closing date. A missing
/// date on either side is always valid.
pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    closing_date: Option<NaiveDate>,
) -> DateRangeReport {
    match (start_date, closing_date) {
        (Some(start), Some(closing)) if start > closing => DateRangeReport {
            valid: false,
            start_message: Some(START_DATE_MESSAGE),
            closing_message: Some(CLOSING_DATE_MESSAGE),
        },
        _ => DateRangeReport::ok(),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// Cleared date inputs are stored as "" by some presentation layers.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
