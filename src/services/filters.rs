//! Filter state manager: holds the criteria, guards the date range and keeps
//! the persisted copy in sync.

use crate::domain::filter::{DateRangeReport, FilterCriteria, FilterUpdate};
use crate::repository::FilterStore;
use crate::services::{ServiceError, ServiceResult};

/// Well-known key of the persisted filter blob.
pub const DEFAULT_STORAGE_KEY: &str = "filterParam";

/// Parses a persisted filter blob.
pub fn parse_persisted(raw: &str) -> ServiceResult<FilterCriteria> {
    serde_json::from_str(raw).map_err(|err| ServiceError::MalformedPersistedState(err.to_string()))
}

/// Initial criteria from the raw persisted value. Absent or malformed blobs
/// fall back to blank criteria.
pub fn initialize(raw: Option<&str>) -> FilterCriteria {
    match raw {
        None => FilterCriteria::default(),
        Some(raw) => parse_persisted(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring persisted filters: {err}");
            FilterCriteria::default()
        }),
    }
}

/// Result of applying one field update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The value equals what was already stored.
    Unchanged,
    /// A valid change that should be fetched.
    Committed,
    /// The date range is violated; fetching is withheld.
    Invalid(DateRangeReport),
}

#[derive(Clone, Debug)]
pub struct FilterState {
    criteria: FilterCriteria,
    date_range: DateRangeReport,
    storage_key: String,
}

impl FilterState {
    pub fn new(criteria: FilterCriteria, storage_key: impl Into<String>) -> Self {
        let date_range = criteria.date_range();
        Self {
            criteria,
            date_range,
            storage_key: storage_key.into(),
        }
    }

    /// Restores the criteria persisted under `storage_key`. Never fails:
    /// unreadable storage counts as an absent blob.
    pub fn load<S>(store: &S, storage_key: &str) -> Self
    where
        S: FilterStore + ?Sized,
    {
        let raw = store.get(storage_key).unwrap_or_else(|err| {
            log::error!("Failed to read persisted filters: {err}");
            None
        });
        Self::new(initialize(raw.as_deref()), storage_key)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn date_range(&self) -> &DateRangeReport {
        &self.date_range
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Whether the criteria may be sent to the record service.
    pub fn is_valid(&self) -> bool {
        self.date_range.valid
    }

    pub fn is_all_blank(&self) -> bool {
        self.criteria.is_all_blank()
    }

    pub fn apply(&mut self, update: FilterUpdate) -> FilterOutcome {
        let is_date = update.field().is_date();
        let changed = self.criteria.apply(update);
        if is_date {
            self.date_range = self.criteria.date_range();
        }

        if !self.date_range.valid {
            FilterOutcome::Invalid(self.date_range.clone())
        } else if changed {
            FilterOutcome::Committed
        } else {
            FilterOutcome::Unchanged
        }
    }

    /// Writes the current criteria to storage.
    pub fn persist<S>(&self, store: &S) -> ServiceResult<()>
    where
        S: FilterStore + ?Sized,
    {
        self.persist_criteria(store, &self.criteria)
    }

    /// Writes `criteria` under this state's storage key, leaving the edited
    /// fields alone.
    pub fn persist_criteria<S>(&self, store: &S, criteria: &FilterCriteria) -> ServiceResult<()>
    where
        S: FilterStore + ?Sized,
    {
        let raw = serde_json::to_string(criteria)
            .map_err(|err| ServiceError::Repository(err.into()))?;
        store.set(&self.storage_key, &raw).map_err(|err| {
            log::error!("Failed to persist filters: {err}");
            ServiceError::from(err)
        })?;
        log::debug!("Persisted filters: {raw}");
        Ok(())
    }

    /// Resets every field and drops the persisted blob. Returns `false`
    /// without touching storage when there is nothing to clear.
    pub fn clear<S>(&mut self, store: &S) -> ServiceResult<bool>
    where
        S: FilterStore + ?Sized,
    {
        if self.is_all_blank() {
            return Ok(false);
        }

        self.criteria = FilterCriteria::default();
        self.date_range = DateRangeReport::default();

        store.remove(&self.storage_key).map_err(|err| {
            log::error!("Failed to remove persisted filters: {err}");
            ServiceError::from(err)
        })?;

        Ok(true)
    }
}
