//! Enumerated filter values sourced from object metadata.

use serde::{Deserialize, Serialize};

/// Label shown for the synthetic "no filter" option.
pub const ALL_LABEL: &str = "All";

/// One selectable value of a picklist field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub label: String,
    /// `None` stands for "no filter".
    pub value: Option<String>,
}

impl PicklistOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    /// The synthetic option that clears the filter.
    #[must_use]
    pub fn all() -> Self {
        Self {
            label: ALL_LABEL.to_string(),
            value: None,
        }
    }
}

/// Prepends the "All" option to the values returned by the metadata service.
pub fn with_all_option(values: Vec<PicklistOption>) -> Vec<PicklistOption> {
    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(PicklistOption::all());
    options.extend(values);
    options
}
