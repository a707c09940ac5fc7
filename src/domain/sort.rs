//! Column sorting for the cached record set.

use std::str::FromStr;

use serde::Serialize;

use crate::domain::location::{Location, LocationField};
use crate::domain::types::TypeConstraintError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort direction `{other}`"
            ))),
        }
    }
}

/// Column and direction of the active sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: LocationField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: LocationField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: LocationField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: LocationField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Returns a newly ordered copy of `locations`.
///
/// The sort is stable in both directions: descending flips the comparator,
/// not the output, so equal keys keep their original relative order.
pub fn sort_locations(locations: &[Location], spec: SortSpec) -> Vec<Location> {
    let mut sorted = locations.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = a.sort_key(spec.field).cmp(&b.sort_key(spec.field));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}
