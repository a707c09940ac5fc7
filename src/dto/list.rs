use serde::Serialize;

use crate::domain::filter::{DateRangeReport, FilterCriteria};
use crate::domain::location::{Column, Location};
use crate::domain::picklist::PicklistOption;
use crate::domain::sort::SortSpec;
use crate::pagination::{ControlStatus, PaginationState};

/// Visible window emitted after every page change.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChanged {
    pub records: Vec<Location>,
    pub page: usize,
    pub total_pages: usize,
    pub start_record: usize,
    pub end_record: usize,
    pub end: bool,
}

impl PageChanged {
    pub fn new(records: Vec<Location>, state: &PaginationState) -> Self {
        Self {
            records,
            page: state.current_page,
            total_pages: state.total_pages,
            start_record: state.start_record,
            end_record: state.end_record,
            end: state.end,
        }
    }
}

/// Notifications published by the location list.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "detail", rename_all = "camelCase")]
pub enum ListEvent {
    PageChanged(PageChanged),
    /// Button states, published shortly after the page settles.
    ControlsChanged(ControlStatus),
    FetchFailed(String),
    FiltersCleared,
}

/// Full snapshot of what the presentation layer renders.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub columns: Vec<Column>,
    pub criteria: FilterCriteria,
    pub date_range: DateRangeReport,
    pub records_to_display: Vec<Location>,
    pub pagination: PaginationState,
    pub control_status: ControlStatus,
    pub page_links: Vec<Option<usize>>,
    pub sort: Option<SortSpec>,
    pub vaccine_type_options: Vec<PicklistOption>,
    pub is_loading: bool,
    pub error: Option<String>,
}
