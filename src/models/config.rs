//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::types::{PageSize, TypeConstraintError};
use crate::services::filters::DEFAULT_STORAGE_KEY;
use crate::services::list::ListSettings;
use crate::services::runtime::RuntimeSettings;

fn default_records_per_page() -> String {
    PageSize::DEFAULT.to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_control_refresh_delay_ms() -> u64 {
    50
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the location list binary.
pub struct ListConfig {
    /// Kept as a string like the host setting it mirrors; validated by
    /// [`ListConfig::list_settings`].
    #[serde(default = "default_records_per_page")]
    pub records_per_page: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_control_refresh_delay_ms")]
    pub control_refresh_delay_ms: u64,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// JSON file holding the persisted filters.
    pub filters_file: String,
    /// JSON array of locations served by the local record source.
    pub locations_file: String,
}

impl ListConfig {
    pub fn list_settings(&self) -> Result<ListSettings, TypeConstraintError> {
        Ok(ListSettings {
            page_size: self.records_per_page.parse()?,
            storage_key: self.storage_key.clone(),
        })
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            control_delay: Duration::from_millis(self.control_refresh_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ListConfig {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn omitted_keys_take_defaults() {
        let config = parse(r#"{"filters_file":"f.json","locations_file":"l.json"}"#);
        let list = config.list_settings().unwrap();
        assert_eq!(list.page_size.get(), 15);
        assert_eq!(list.storage_key, "filterParam");

        let runtime = config.runtime_settings();
        assert_eq!(runtime.debounce, Duration::from_millis(300));
        assert_eq!(runtime.control_delay, Duration::from_millis(50));
    }

    #[test]
    fn invalid_records_per_page_is_reported() {
        let config = parse(
            r#"{"records_per_page":"zero","filters_file":"f.json","locations_file":"l.json"}"#,
        );
        assert!(config.list_settings().is_err());
    }
}
