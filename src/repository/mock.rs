//! Mock collaborators for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::filter::FilterCriteria;
use crate::domain::location::Location;
use crate::domain::navigation::NavigationTarget;
use crate::domain::picklist::PicklistOption;
use crate::domain::toast::Toast;
use crate::domain::types::RecordTypeId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{FilterStore, LocationReader, Navigator, Notifier, PicklistReader};

mock! {
    pub LocationReader {}

    #[async_trait]
    impl LocationReader for LocationReader {
        async fn fetch_locations(&self, criteria: &FilterCriteria) -> RepositoryResult<Vec<Location>>;
    }
}

mock! {
    pub PicklistReader {}

    #[async_trait]
    impl PicklistReader for PicklistReader {
        async fn default_record_type_id(&self, object_api_name: &str) -> RepositoryResult<RecordTypeId>;
        async fn picklist_values(
            &self,
            record_type_id: &RecordTypeId,
            field_api_name: &str,
        ) -> RepositoryResult<Vec<PicklistOption>>;
    }
}

mock! {
    pub FilterStore {}

    impl FilterStore for FilterStore {
        fn get(&self, key: &str) -> RepositoryResult<Option<String>>;
        fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
        fn remove(&self, key: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub Navigator {}

    impl Navigator for Navigator {
        fn navigate(&self, target: &NavigationTarget) -> RepositoryResult<()>;
    }
}

mock! {
    pub Notifier {}

    impl Notifier for Notifier {
        fn show_toast(&self, toast: &Toast);
    }
}
