use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{LocationId, TypeConstraintError};

/// Location record as returned by the record fetch service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub vaccine_type: Option<String>,
    /// Brand tags of the vaccine supply, display only.
    #[serde(default)]
    pub supply_tags: Option<String>,
    #[serde(default)]
    pub available_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub close_date: Option<NaiveDate>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Location {
    #[must_use]
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            vaccine_type: None,
            supply_tags: None,
            available_date: None,
            start_date: None,
            close_date: None,
            active: false,
            archived: false,
        }
    }

    /// Link target rendered in the name column.
    pub fn name_url(&self) -> String {
        format!("/location/{}", self.id)
    }

    /// Comparable representation of one column of this record.
    pub fn sort_key(&self, field: LocationField) -> SortKey<'_> {
        match field {
            LocationField::Name => SortKey::Text(Some(self.name.as_str())),
            LocationField::Address => SortKey::Text(self.address.as_deref()),
            LocationField::VaccineType => SortKey::Text(self.vaccine_type.as_deref()),
            LocationField::AvailableDate => SortKey::Date(self.available_date),
            LocationField::StartDate => SortKey::Date(self.start_date),
            LocationField::CloseDate => SortKey::Date(self.close_date),
            LocationField::Active => SortKey::Flag(self.active),
        }
    }
}

/// Sortable columns of the location table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationField {
    Name,
    Address,
    VaccineType,
    AvailableDate,
    StartDate,
    CloseDate,
    Active,
}

impl LocationField {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationField::Name => "name",
            LocationField::Address => "address",
            LocationField::VaccineType => "vaccineType",
            LocationField::AvailableDate => "availableDate",
            LocationField::StartDate => "startDate",
            LocationField::CloseDate => "closeDate",
            LocationField::Active => "active",
        }
    }
}

impl Display for LocationField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            // The name column links to the record, so its field is the url.
            "name" | "nameUrl" => Ok(LocationField::Name),
            "address" => Ok(LocationField::Address),
            "vaccineType" | "vaccine_type" => Ok(LocationField::VaccineType),
            "availableDate" | "available_date" => Ok(LocationField::AvailableDate),
            "startDate" | "start_date" => Ok(LocationField::StartDate),
            "closeDate" | "close_date" => Ok(LocationField::CloseDate),
            "active" => Ok(LocationField::Active),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort field `{other}`"
            ))),
        }
    }
}

/// Comparable view of a column value.
///
/// Text compares lexicographically, dates chronologically and flags with
/// `false < true`. Missing values sort before present ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey<'a> {
    Text(Option<&'a str>),
    Date(Option<NaiveDate>),
    Flag(bool),
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Flag(a), SortKey::Flag(b)) => a.cmp(b),
            // Keys of one column always share a variant; order by variant otherwise.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Text(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Flag(_) => 2,
        }
    }
}

/// How a column is rendered by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    Text,
    Url,
    Picklist,
    DateLocal,
    Boolean,
}

/// Table column definition handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: &'static str,
    pub field: LocationField,
    pub kind: ColumnKind,
    pub initial_width: Option<u16>,
}

pub const COLUMNS: [Column; 7] = [
    Column {
        label: "Location Name",
        field: LocationField::Name,
        kind: ColumnKind::Url,
        initial_width: Some(300),
    },
    Column {
        label: "Address",
        field: LocationField::Address,
        kind: ColumnKind::Text,
        initial_width: Some(300),
    },
    Column {
        label: "Vaccine Type",
        field: LocationField::VaccineType,
        kind: ColumnKind::Picklist,
        initial_width: None,
    },
    Column {
        label: "Available Date",
        field: LocationField::AvailableDate,
        kind: ColumnKind::DateLocal,
        initial_width: None,
    },
    Column {
        label: "Start Date",
        field: LocationField::StartDate,
        kind: ColumnKind::DateLocal,
        initial_width: None,
    },
    Column {
        label: "Closing Date",
        field: LocationField::CloseDate,
        kind: ColumnKind::DateLocal,
        initial_width: None,
    },
    Column {
        label: "Active",
        field: LocationField::Active,
        kind: ColumnKind::Boolean,
        initial_width: Some(100),
    },
];
