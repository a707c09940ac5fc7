//! [`LocationReader`] over a fixed, in-memory record set.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::filter::FilterCriteria;
use crate::domain::location::Location;
use crate::domain::picklist::PicklistOption;
use crate::domain::types::RecordTypeId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{LocationReader, PicklistReader};

/// Record type id reported by [`StaticPicklistSource`].
pub const MASTER_RECORD_TYPE_ID: &str = "012000000000000AAA";

/// Serves a fixed record set, applying the filter rules of the record
/// service: case-insensitive substring match on name and address, exact
/// vaccine type, start date on or after `start_date`, close date on or before
/// `closing_date`, and an exact archived flag.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationSource {
    locations: Vec<Location>,
}

impl StaticLocationSource {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// Loads a JSON array of locations.
    pub fn from_json_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let raw = fs::read_to_string(path)?;
        let locations: Vec<Location> = serde_json::from_str(&raw)?;
        Ok(Self::new(locations))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

/// Whether `location` satisfies every non-blank field of `criteria`.
pub fn matches(location: &Location, criteria: &FilterCriteria) -> bool {
    if !contains_ignore_case(Some(&location.name), criteria.name.trim()) {
        return false;
    }
    if !contains_ignore_case(location.address.as_deref(), criteria.address.trim()) {
        return false;
    }
    if !criteria.vaccine_type.is_empty()
        && location.vaccine_type.as_deref() != Some(criteria.vaccine_type.as_str())
    {
        return false;
    }
    if let Some(start) = criteria.start_date {
        if location.start_date.is_none_or(|d| d < start) {
            return false;
        }
    }
    if let Some(closing) = criteria.closing_date {
        if location.close_date.is_none_or(|d| d > closing) {
            return false;
        }
    }
    location.archived == criteria.archived
}

#[async_trait]
impl LocationReader for StaticLocationSource {
    async fn fetch_locations(&self, criteria: &FilterCriteria) -> RepositoryResult<Vec<Location>> {
        Ok(self
            .locations
            .iter()
            .filter(|location| matches(location, criteria))
            .cloned()
            .collect())
    }
}

/// Picklist metadata derived from the vaccine types present in a record set.
#[derive(Debug, Clone, Default)]
pub struct StaticPicklistSource {
    values: Vec<PicklistOption>,
}

impl StaticPicklistSource {
    pub fn new(values: Vec<PicklistOption>) -> Self {
        Self { values }
    }

    /// Distinct vaccine types of `locations`, in alphabetical order.
    pub fn from_locations(locations: &[Location]) -> Self {
        let types: BTreeSet<&str> = locations
            .iter()
            .filter_map(|location| location.vaccine_type.as_deref())
            .filter(|value| !value.is_empty())
            .collect();
        Self::new(
            types
                .into_iter()
                .map(|value| PicklistOption::new(value, value))
                .collect(),
        )
    }
}

#[async_trait]
impl PicklistReader for StaticPicklistSource {
    async fn default_record_type_id(&self, object_api_name: &str) -> RepositoryResult<RecordTypeId> {
        log::debug!("Default record type of {object_api_name} requested");
        Ok(RecordTypeId::new(MASTER_RECORD_TYPE_ID)?)
    }

    async fn picklist_values(
        &self,
        record_type_id: &RecordTypeId,
        field_api_name: &str,
    ) -> RepositoryResult<Vec<PicklistOption>> {
        if record_type_id.as_str() != MASTER_RECORD_TYPE_ID {
            return Err(RepositoryError::NotFound);
        }
        log::debug!("Picklist values of {field_api_name} requested");
        Ok(self.values.clone())
    }
}

impl From<&StaticLocationSource> for StaticPicklistSource {
    fn from(source: &StaticLocationSource) -> Self {
        Self::from_locations(&source.locations)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::LocationId;

    fn location(id: &str, name: &str, address: &str, vaccine: &str) -> Location {
        let mut location = Location::new(LocationId::new(id).unwrap(), name);
        location.address = Some(address.to_string());
        location.vaccine_type = Some(vaccine.to_string());
        location
    }

    fn source() -> StaticLocationSource {
        let mut archived = location("3", "Old Hall", "9 Elm St", "Moderna");
        archived.archived = true;
        let mut dated = location("4", "Pop-up", "1 Oak Rd", "Pfizer");
        dated.start_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        dated.close_date = NaiveDate::from_ymd_opt(2024, 5, 20);
        StaticLocationSource::new(vec![
            location("1", "North Clinic", "12 Main St", "Pfizer"),
            location("2", "South Pharmacy", "40 Main St", "Moderna"),
            archived,
            dated,
        ])
    }

    fn ids(locations: &[Location]) -> Vec<&str> {
        locations.iter().map(|l| l.id.as_str()).collect()
    }

    #[tokio::test]
    async fn blank_criteria_returns_active_records() {
        let found = source()
            .fetch_locations(&FilterCriteria::default())
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["1", "2", "4"]);
    }

    #[tokio::test]
    async fn name_and_address_match_substrings_ignoring_case() {
        let criteria = FilterCriteria {
            name: "clinic".into(),
            address: "MAIN".into(),
            ..FilterCriteria::default()
        };
        let found = source().fetch_locations(&criteria).await.unwrap();
        assert_eq!(ids(&found), vec!["1"]);
    }

    #[tokio::test]
    async fn vaccine_type_and_archived_are_exact() {
        let criteria = FilterCriteria {
            vaccine_type: "Moderna".into(),
            archived: true,
            ..FilterCriteria::default()
        };
        let found = source().fetch_locations(&criteria).await.unwrap();
        assert_eq!(ids(&found), vec!["3"]);
    }

    #[tokio::test]
    async fn date_range_bounds_start_and_close() {
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            closing_date: NaiveDate::from_ymd_opt(2024, 5, 31),
            ..FilterCriteria::default()
        };
        let found = source().fetch_locations(&criteria).await.unwrap();
        assert_eq!(ids(&found), vec!["4"]);
    }

    #[tokio::test]
    async fn picklist_lists_distinct_vaccine_types() {
        let picklist = StaticPicklistSource::from(&source());
        let record_type = picklist
            .default_record_type_id("skedbg__Vaccine__c")
            .await
            .unwrap();
        let values = picklist
            .picklist_values(&record_type, "skedbg__Vaccine_Type__c")
            .await
            .unwrap();
        let labels: Vec<_> = values.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Moderna", "Pfizer"]);
    }

    #[tokio::test]
    async fn unknown_record_type_is_not_found() {
        let picklist = StaticPicklistSource::default();
        let other = RecordTypeId::new("012999").unwrap();
        let result = picklist.picklist_values(&other, "field").await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
