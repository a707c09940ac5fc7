//! Vaccine type options for the filter bar.

use crate::domain::picklist::{PicklistOption, with_all_option};
use crate::repository::PicklistReader;
use crate::services::{ServiceError, ServiceResult};

/// Object whose metadata describes the vaccine types.
pub const VACCINE_OBJECT: &str = "skedbg__Vaccine__c";
/// Picklist field listing the vaccine types.
pub const VACCINE_TYPE_FIELD: &str = "skedbg__Vaccine_Type__c";

async fn fetch_options<R>(
    reader: &R,
    object_api_name: &str,
    field_api_name: &str,
) -> ServiceResult<Vec<PicklistOption>>
where
    R: PicklistReader + ?Sized,
{
    let record_type = reader
        .default_record_type_id(object_api_name)
        .await
        .map_err(|err| ServiceError::PicklistLoadFailure(err.to_string()))?;
    let values = reader
        .picklist_values(&record_type, field_api_name)
        .await
        .map_err(|err| ServiceError::PicklistLoadFailure(err.to_string()))?;
    Ok(with_all_option(values))
}

/// Loads the picklist of `field_api_name` with the "All" option first.
/// Failures are logged and yield no options at all.
pub async fn load_options<R>(
    reader: &R,
    object_api_name: &str,
    field_api_name: &str,
) -> Vec<PicklistOption>
where
    R: PicklistReader + ?Sized,
{
    match fetch_options(reader, object_api_name, field_api_name).await {
        Ok(options) => {
            log::debug!("Loaded {} options for {field_api_name}", options.len());
            options
        }
        Err(err) => {
            log::error!("{err}");
            Vec::new()
        }
    }
}

pub async fn load_vaccine_type_options<R>(reader: &R) -> Vec<PicklistOption>
where
    R: PicklistReader + ?Sized,
{
    load_options(reader, VACCINE_OBJECT, VACCINE_TYPE_FIELD).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StaticPicklistSource;

    #[tokio::test]
    async fn options_start_with_all() {
        let reader = StaticPicklistSource::new(vec![PicklistOption::new("Pfizer", "Pfizer")]);
        let options = load_vaccine_type_options(&reader).await;
        assert_eq!(options, vec![
            PicklistOption::all(),
            PicklistOption::new("Pfizer", "Pfizer"),
        ]);
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use super::*;
    use crate::domain::types::RecordTypeId;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockPicklistReader;

    #[tokio::test]
    async fn values_are_requested_for_the_default_record_type() {
        let mut reader = MockPicklistReader::new();
        reader
            .expect_default_record_type_id()
            .withf(|object| object.to_string() == VACCINE_OBJECT)
            .times(1)
            .returning(|_| Ok(RecordTypeId::new("012A").unwrap()));
        reader
            .expect_picklist_values()
            .withf(|record_type, field| {
                record_type.as_str() == "012A" && field.to_string() == VACCINE_TYPE_FIELD
            })
            .times(1)
            .returning(|_, _| Ok(vec![PicklistOption::new("Moderna", "Moderna")]));

        let options = load_vaccine_type_options(&reader).await;
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].label, "Moderna");
    }

    #[tokio::test]
    async fn metadata_failure_yields_no_options() {
        let mut reader = MockPicklistReader::new();
        reader
            .expect_default_record_type_id()
            .returning(|_| Err(RepositoryError::Backend("offline".into())));
        reader.expect_picklist_values().times(0);

        assert!(load_vaccine_type_options(&reader).await.is_empty());
    }

    #[tokio::test]
    async fn values_failure_yields_no_options() {
        let mut reader = MockPicklistReader::new();
        reader
            .expect_default_record_type_id()
            .returning(|_| Ok(RecordTypeId::new("012A").unwrap()));
        reader
            .expect_picklist_values()
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(load_vaccine_type_options(&reader).await.is_empty());
    }
}
