//! Collaborators of the location list and their local adapters.
//!
//! The list never talks to the platform directly: record retrieval, picklist
//! metadata, persisted storage, navigation and toasts all go through the
//! traits below so they can be swapped for in-memory versions in tests.

use async_trait::async_trait;

use crate::domain::filter::FilterCriteria;
use crate::domain::location::Location;
use crate::domain::navigation::NavigationTarget;
use crate::domain::picklist::PicklistOption;
use crate::domain::toast::Toast;
use crate::domain::types::RecordTypeId;
use crate::repository::errors::RepositoryResult;

pub mod console;
pub mod errors;
pub mod file;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod static_source;

pub use console::{LogNavigator, LogNotifier};
pub use file::JsonFileFilterStore;
pub use memory::MemoryFilterStore;
pub use static_source::{StaticLocationSource, StaticPicklistSource};

/// Remote procedure returning the locations that match a filter set.
#[async_trait]
pub trait LocationReader: Send + Sync {
    async fn fetch_locations(&self, criteria: &FilterCriteria) -> RepositoryResult<Vec<Location>>;
}

/// Object and picklist metadata of the hosting platform.
#[async_trait]
pub trait PicklistReader: Send + Sync {
    async fn default_record_type_id(&self, object_api_name: &str) -> RepositoryResult<RecordTypeId>;
    async fn picklist_values(
        &self,
        record_type_id: &RecordTypeId,
        field_api_name: &str,
    ) -> RepositoryResult<Vec<PicklistOption>>;
}

/// Key-value storage that survives reloads of the list.
pub trait FilterStore: Send + Sync {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
    fn remove(&self, key: &str) -> RepositoryResult<()>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget) -> RepositoryResult<()>;
}

pub trait Notifier: Send + Sync {
    fn show_toast(&self, toast: &Toast);
}
