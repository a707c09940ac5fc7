//! The location list: filter state, cached record set, sort and pagination.
//!
//! The list itself never awaits. Filter changes hand back a [`FetchRequest`]
//! for the caller to run against a [`LocationReader`]; the finished
//! [`FetchResponse`] is fed back through [`LocationList::apply_response`].
//! Every request carries a token and only the latest issued token is
//! accepted, so a slow response can never overwrite a newer one.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::filter::{FilterCriteria, FilterUpdate};
use crate::domain::location::{COLUMNS, Location, LocationField};
use crate::domain::picklist::PicklistOption;
use crate::domain::sort::{SortDirection, SortSpec, sort_locations};
use crate::domain::toast::Toast;
use crate::domain::types::PageSize;
use crate::dto::list::{ListEvent, ListView, PageChanged};
use crate::pagination::{ControlStatus, PageAction, PaginationState};
use crate::repository::errors::RepositoryResult;
use crate::repository::{FilterStore, LocationReader, Notifier};
use crate::services::filters::{DEFAULT_STORAGE_KEY, FilterOutcome, FilterState};
use crate::services::{ServiceError, ServiceResult};

const EVENT_CAPACITY: usize = 64;

/// Settings of one list instance.
#[derive(Clone, Debug)]
pub struct ListSettings {
    pub page_size: PageSize,
    pub storage_key: String,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Fetch the list wants performed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub criteria: FilterCriteria,
}

impl FetchRequest {
    /// Performs the request against `reader`.
    pub async fn run(self, reader: Arc<dyn LocationReader>) -> FetchResponse {
        let result = reader.fetch_locations(&self.criteria).await;
        FetchResponse {
            token: self.token,
            result,
        }
    }
}

#[derive(Debug)]
pub struct FetchResponse {
    pub token: u64,
    pub result: RepositoryResult<Vec<Location>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one.
    Discarded,
}

pub struct LocationList {
    filters: FilterState,
    store: Arc<dyn FilterStore>,
    notifier: Option<Arc<dyn Notifier>>,
    records: Option<Vec<Location>>,
    error: Option<String>,
    page_size: PageSize,
    current_page: usize,
    sort: Option<SortSpec>,
    latest_token: u64,
    in_flight: Option<u64>,
    last_requested: Option<FilterCriteria>,
    vaccine_type_options: Vec<PicklistOption>,
    events: broadcast::Sender<ListEvent>,
}

impl LocationList {
    /// Creates the list, restoring the filters persisted in `store`.
    pub fn new(store: Arc<dyn FilterStore>, settings: ListSettings) -> Self {
        let filters = FilterState::load(store.as_ref(), &settings.storage_key);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            filters,
            store,
            notifier: None,
            records: None,
            error: None,
            page_size: settings.page_size,
            current_page: 1,
            sort: None,
            latest_token: 0,
            in_flight: None,
            last_requested: None,
            vaccine_type_options: Vec::new(),
            events,
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<ListEvent> {
        self.events.clone()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    /// Issues a fetch for the current criteria unconditionally.
    pub fn issue_fetch(&mut self) -> FetchRequest {
        self.latest_token += 1;
        self.in_flight = Some(self.latest_token);
        let criteria = self.filters.criteria().clone();
        self.last_requested = Some(criteria.clone());
        log::debug!("Issuing fetch #{} for {:?}", self.latest_token, criteria);
        FetchRequest {
            token: self.latest_token,
            criteria,
        }
    }

    /// Issues a fetch for the current criteria unless the date range is
    /// inverted.
    pub fn fetch_current(&mut self) -> Option<FetchRequest> {
        if !self.filters.is_valid() {
            log::debug!("Withholding fetch: {}", ServiceError::InvalidDateRange);
            return None;
        }
        Some(self.issue_fetch())
    }

    pub fn update_filter(&mut self, update: FilterUpdate) -> Option<FetchRequest> {
        self.update_filters([update])
    }

    /// Applies a batch of field updates and returns at most one fetch: only
    /// when the resulting criteria are valid and differ from the last ones
    /// requested.
    pub fn update_filters(
        &mut self,
        updates: impl IntoIterator<Item = FilterUpdate>,
    ) -> Option<FetchRequest> {
        for update in updates {
            let field = update.field();
            match self.filters.apply(update) {
                FilterOutcome::Invalid(_) => {
                    log::debug!(
                        "Withholding fetch after {field} change: {}",
                        ServiceError::InvalidDateRange
                    );
                }
                FilterOutcome::Committed => log::debug!("Filter {field} changed"),
                FilterOutcome::Unchanged => {}
            }
        }

        if !self.filters.is_valid() {
            return None;
        }
        if self.last_requested.as_ref() == Some(self.filters.criteria()) {
            return None;
        }
        Some(self.issue_fetch())
    }

    /// Resets every filter. Does nothing, storage included, when the filters
    /// are already blank.
    pub fn clear_filters(&mut self) -> Option<FetchRequest> {
        let cleared = match self.filters.clear(self.store.as_ref()) {
            Ok(cleared) => cleared,
            Err(err) => {
                // Fields are reset even when storage refused the removal.
                log::error!("Failed to clear filters: {err}");
                true
            }
        };
        if !cleared {
            log::debug!("Filters already blank, nothing to clear");
            return None;
        }
        self.publish(ListEvent::FiltersCleared);
        self.update_filters([])
    }

    pub fn apply_response(&mut self, response: FetchResponse) -> ResponseOutcome {
        if response.token != self.latest_token {
            log::debug!(
                "Discarding stale response #{} (latest #{})",
                response.token,
                self.latest_token
            );
            return ResponseOutcome::Discarded;
        }
        self.in_flight = None;

        match response.result {
            Ok(locations) => {
                let mut locations = dedup_by_id(locations);
                if let Some(spec) = self.sort {
                    locations = sort_locations(&locations, spec);
                }
                log::info!("Fetched {} locations", locations.len());
                self.records = Some(locations);
                self.error = None;
                // Only the latest request gets here, so `last_requested` holds
                // the criteria behind this result.
                if let Some(criteria) = &self.last_requested {
                    if let Err(err) = self.filters.persist_criteria(self.store.as_ref(), criteria) {
                        log::error!("Failed to store filters: {err}");
                    }
                }
                self.current_page = 1;
                self.emit_page();
                ResponseOutcome::Applied
            }
            Err(err) => {
                let message = err.to_string();
                log::error!("{}", ServiceError::FetchFailure(message.clone()));
                self.records = None;
                self.error = Some(message.clone());
                self.current_page = 1;
                if let Some(notifier) = &self.notifier {
                    notifier.show_toast(&Toast::error("Error loading locations", &message));
                }
                self.publish(ListEvent::FetchFailed(message));
                self.emit_page();
                ResponseOutcome::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Full cached record set, `None` before the first fetch or after a
    /// failed one.
    pub fn records(&self) -> Option<&[Location]> {
        self.records.as_deref()
    }

    fn all_records(&self) -> &[Location] {
        self.records.as_deref().unwrap_or_default()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState::compute(self.all_records().len(), self.page_size, self.current_page)
    }

    pub fn records_to_display(&self) -> &[Location] {
        &self.all_records()[self.pagination().range()]
    }

    pub fn control_status(&self) -> ControlStatus {
        self.pagination().control_status()
    }

    pub fn page_links(&self) -> Vec<Option<usize>> {
        self.pagination().page_links()
    }

    pub fn navigate(&mut self, action: PageAction) -> PageChanged {
        self.current_page = action.target(&self.pagination());
        self.emit_page()
    }

    pub fn first(&mut self) -> PageChanged {
        self.navigate(PageAction::First)
    }

    pub fn previous(&mut self) -> PageChanged {
        self.navigate(PageAction::Previous)
    }

    pub fn next(&mut self) -> PageChanged {
        self.navigate(PageAction::Next)
    }

    pub fn last(&mut self) -> PageChanged {
        self.navigate(PageAction::Last)
    }

    pub fn go_to(&mut self, page: usize) -> PageChanged {
        self.navigate(PageAction::GoTo(page))
    }

    /// Changes the page size, keeping the current page inside the new range.
    pub fn set_page_size(&mut self, page_size: PageSize) -> PageChanged {
        self.page_size = page_size;
        self.current_page = self.pagination().current_page;
        self.emit_page()
    }

    /// Parses the string-typed `recordsPerPage` setting. Invalid input is
    /// rejected and leaves the list untouched.
    pub fn set_records_per_page(&mut self, raw: &str) -> ServiceResult<PageChanged> {
        let page_size = raw.parse::<PageSize>().map_err(|err| {
            log::warn!("Rejected records per page `{raw}`: {err}");
            ServiceError::InvalidPageSize(err)
        })?;
        Ok(self.set_page_size(page_size))
    }

    /// Reorders the whole cached set and returns to the first page.
    pub fn sort_by(&mut self, spec: SortSpec) -> PageChanged {
        if let Some(records) = self.records.take() {
            self.records = Some(sort_locations(&records, spec));
        }
        self.sort = Some(spec);
        self.current_page = 1;
        self.emit_page()
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn sorted_by(&self) -> Option<LocationField> {
        self.sort.map(|spec| spec.field)
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.map(|spec| spec.direction).unwrap_or_default()
    }

    pub fn set_vaccine_type_options(&mut self, options: Vec<PicklistOption>) {
        self.vaccine_type_options = options;
    }

    pub fn vaccine_type_options(&self) -> &[PicklistOption] {
        &self.vaccine_type_options
    }

    /// Publishes the current button states.
    pub fn publish_controls(&self) -> ControlStatus {
        let status = self.control_status();
        self.publish(ListEvent::ControlsChanged(status));
        status
    }

    pub fn view(&self) -> ListView {
        let pagination = self.pagination();
        ListView {
            columns: COLUMNS.to_vec(),
            criteria: self.filters.criteria().clone(),
            date_range: self.filters.date_range().clone(),
            records_to_display: self.records_to_display().to_vec(),
            pagination,
            control_status: pagination.control_status(),
            page_links: pagination.page_links(),
            sort: self.sort,
            vaccine_type_options: self.vaccine_type_options.clone(),
            is_loading: self.is_loading(),
            error: self.error.clone(),
        }
    }

    fn emit_page(&mut self) -> PageChanged {
        let state = self.pagination();
        self.current_page = state.current_page;
        let page = PageChanged::new(self.all_records()[state.range()].to_vec(), &state);
        self.publish(ListEvent::PageChanged(page.clone()));
        page
    }

    fn publish(&self, event: ListEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

fn dedup_by_id(locations: Vec<Location>) -> Vec<Location> {
    let mut seen = HashSet::with_capacity(locations.len());
    let total = locations.len();
    let unique: Vec<Location> = locations
        .into_iter()
        .filter(|location| seen.insert(location.id.clone()))
        .collect();
    if unique.len() != total {
        log::warn!(
            "Dropped {} locations with duplicate ids",
            total - unique.len()
        );
    }
    unique
}
